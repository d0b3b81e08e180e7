use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::SarConfig;
use crate::device_colors::DeviceColors;
use crate::feature_store::{Feature, FeatureStore, Geometry, Layer};
use crate::trail_segmenter::{self, validate_positions, PositionSample, Trails};
use crate::utils::parse_iso8601_timestamp;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    pub name: String,
    pub status: DeviceStatus,
    pub last_update: Option<String>,
}

/// A tracking backend (Traccar, CSV exports, ...).
pub trait PositionProvider {
    /// Latest position of every device.
    fn current_positions(&self) -> Result<Vec<PositionSample>>;

    /// Position history, optionally only samples at or after `since` (ISO-8601).
    fn breadcrumbs(&self, since: Option<&str>) -> Result<Vec<PositionSample>>;

    fn devices(&self) -> Result<Vec<Device>>;

    fn test_connection(&self) -> Result<()>;
}

/// Picks the most recent sample of every device, ordered by device id.
pub fn latest_positions(samples: &[PositionSample]) -> Vec<PositionSample> {
    let mut latest: BTreeMap<&str, &PositionSample> = BTreeMap::new();
    for sample in samples {
        latest
            .entry(sample.device_id.as_str())
            .and_modify(|current| {
                if sample.timestamp >= current.timestamp {
                    *current = sample;
                }
            })
            .or_insert(sample);
    }
    latest.into_values().cloned().collect()
}

/// Keeps the samples at or after `since`. Samples with an unparsable
/// timestamp are dropped.
pub fn filter_since(samples: Vec<PositionSample>, since: &str) -> Result<Vec<PositionSample>> {
    let since = parse_iso8601_timestamp(since)?;
    Ok(samples
        .into_iter()
        .filter(|sample| match parse_iso8601_timestamp(&sample.timestamp) {
            Ok(time) => time >= since,
            Err(e) => {
                warn!("[tracking] dropping sample of device {}: {e}", sample.device_id);
                false
            }
        })
        .collect())
}

#[derive(Debug)]
pub struct TrackingUpdate {
    pub position_count: usize,
    pub trails: Trails,
}

fn position_feature(sample: &PositionSample, colors: &DeviceColors) -> Result<Feature> {
    Feature::new(
        Layer::CurrentPositions,
        Geometry::Point(sample.point()),
        json!({
            "device_id": sample.device_id,
            "name": sample.name,
            "timestamp": sample.timestamp,
            "altitude": sample.altitude,
            "speed": sample.speed,
            "battery": sample.battery,
            "color": colors.get(&sample.device_id).to_hex(),
        }),
    )
}

fn breadcrumb_features(trails: &Trails, colors: &DeviceColors) -> Result<Vec<Feature>> {
    trails
        .segments
        .values()
        .flatten()
        .map(|segment| {
            Feature::new(
                Layer::Breadcrumbs,
                Geometry::LineString(segment.points.clone()),
                json!({
                    "device_id": segment.device_id,
                    "name": segment.name,
                    "color": colors.get(&segment.device_id).to_hex(),
                }),
            )
        })
        .collect()
}

/// Pulls positions and history from `provider` and rewrites both tracking
/// layers. Nothing is written when any of the data is invalid.
///
/// Current positions are replaced before breadcrumbs. A store that fails on
/// the second replace keeps the new positions next to the old breadcrumbs.
pub fn refresh_tracking<P: PositionProvider, S: FeatureStore>(
    provider: &P,
    config: &SarConfig,
    colors: &DeviceColors,
    store: &mut S,
    since: Option<&str>,
) -> Result<TrackingUpdate> {
    let current = provider.current_positions()?;
    validate_positions(&current)?;
    let breadcrumbs = provider.breadcrumbs(since)?;
    let trails = trail_segmenter::segment(&breadcrumbs, config.trail.gap_minutes)?;

    let positions = current
        .iter()
        .map(|sample| position_feature(sample, colors))
        .collect::<Result<Vec<_>>>()?;
    let segments = breadcrumb_features(&trails, colors)?;

    store.ensure_layer(Layer::CurrentPositions)?;
    store.ensure_layer(Layer::Breadcrumbs)?;
    let position_count = positions.len();
    store.replace_features(Layer::CurrentPositions, positions)?;
    store.replace_features(Layer::Breadcrumbs, segments)?;

    for warning in &trails.warnings {
        debug!("[tracking] {}: {}", warning.device_id, warning.message);
    }
    info!(
        "[tracking] refreshed {} positions, {} breadcrumb segments ({} warnings)",
        position_count,
        trails.segment_count(),
        trails.warnings.len()
    );
    Ok(TrackingUpdate {
        position_count,
        trails,
    })
}
