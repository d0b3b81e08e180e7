/* Search sector wedges.

Sector arcs are computed on a sphere with the mean earth radius instead of the
latitude dependent radius `geodesic::destination_point` uses, so a sector and
a range ring of the same radius do not line up exactly (about a meter per
kilometer at Irish latitudes).
*/
use std::f64::consts::PI;

use crate::geo_point::{GeoPoint, Polygon};
use crate::geodesic::spherical_destination;

// unit: meter
pub const MEAN_EARTH_RADIUS: f64 = 6371000.0;
pub const DEFAULT_SECTOR_SEGMENTS: usize = 36;

/// Clockwise sweep from `start_bearing` to `end_bearing` in degrees.
pub fn sweep_angle(start_bearing: f64, end_bearing: f64) -> f64 {
    let angle_range = end_bearing - start_bearing;
    if angle_range < 0.0 {
        angle_range + 360.0
    } else {
        angle_range
    }
}

/// Wedge polygon: `[center] + arc + [center]`, where the arc has
/// `segments + 1` points sweeping clockwise from `start_bearing` to
/// `end_bearing`.
pub fn sector_polygon(
    center: GeoPoint,
    radius_m: f64,
    start_bearing: f64,
    end_bearing: f64,
    segments: usize,
) -> Polygon {
    let segments = segments.max(1);
    let angle_range = sweep_angle(start_bearing, end_bearing);
    let angular_distance = radius_m / MEAN_EARTH_RADIUS;
    let lat1 = center.latitude.to_radians();
    let lon1 = center.longitude.to_radians();

    let mut ring = Vec::with_capacity(segments + 3);
    ring.push(center);
    for i in 0..=segments {
        let bearing = start_bearing + angle_range * i as f64 / segments as f64;
        ring.push(spherical_destination(
            lat1,
            lon1,
            bearing.to_radians(),
            angular_distance,
        ));
    }
    ring.push(center);
    Polygon::from_closed_ring(ring)
}

/// Sector area in km^2 on a flat disc of `radius_m`.
///
/// The span is `|end - start|`. A span of 360 degrees or more is the full
/// circle; a span above 180 degrees is folded to `360 - span`.
pub fn compute_sector_area(radius_m: f64, start_bearing: f64, end_bearing: f64) -> f64 {
    let mut span = (end_bearing - start_bearing).abs();
    if span >= 360.0 {
        span = 360.0;
    } else if span > 180.0 {
        span = 360.0 - span;
    }
    PI * radius_m * radius_m * (span / 360.0) / 1e6
}
