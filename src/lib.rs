#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate lazy_static;

pub mod bearing_line;
pub mod config;
pub mod device_colors;
pub mod drawing;
pub mod feature_store;
pub mod geo_point;
pub mod geodesic;
pub mod logs;
pub mod lpb_statistics;
pub mod markers;
pub mod range_rings;
pub mod sector;
pub mod tracking;
pub mod trail_segmenter;
pub mod utils;
