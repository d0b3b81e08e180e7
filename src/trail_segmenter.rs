use std::collections::BTreeMap;

use anyhow::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geo_point::GeoPoint;
use crate::utils::{minutes_between, parse_timestamp, ParsedTimestamp};

pub const DEFAULT_GAP_MINUTES: f64 = 5.0;

/// One position report of a tracked device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub device_id: String,
    pub name: String,
    // ISO-8601, kept as received so ordering follows the backend's strings
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub battery: Option<f64>,
}

impl PositionSample {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn validate(&self, index: usize) -> Result<()> {
        if self.device_id.is_empty() {
            bail!("position {index} has an empty device id");
        }
        if self.name.is_empty() {
            bail!("position {index} has an empty name");
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            bail!("position {index} has invalid latitude: {}", self.latitude);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            bail!("position {index} has invalid longitude: {}", self.longitude);
        }
        Ok(())
    }
}

/// Validates a whole batch, failing on the first invalid sample.
pub fn validate_positions(positions: &[PositionSample]) -> Result<()> {
    positions
        .iter()
        .enumerate()
        .try_for_each(|(i, position)| position.validate(i))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProcessResult {
    Append,
    NewSegment,
}

/// A continuous piece of a device's trail, at least two points long.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailSegment {
    pub device_id: String,
    pub name: String,
    pub points: Vec<GeoPoint>,
}

/// A recovered problem in the input, e.g. an unparsable timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrailWarning {
    pub device_id: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trails {
    // every device of the input has an entry, possibly without segments
    pub segments: BTreeMap<String, Vec<TrailSegment>>,
    pub warnings: Vec<TrailWarning>,
}

impl Trails {
    pub fn segment_count(&self) -> usize {
        self.segments.values().map(|s| s.len()).sum()
    }
}

/// Rebuilds per-device trails from a flat batch of positions. A new segment
/// starts whenever two consecutive samples of a device are more than
/// `gap_minutes` apart.
pub fn segment(positions: &[PositionSample], gap_minutes: f64) -> Result<Trails> {
    if !gap_minutes.is_finite() || gap_minutes <= 0.0 {
        bail!("gap threshold must be a positive number of minutes, got {gap_minutes}");
    }
    validate_positions(positions)?;

    let groups: BTreeMap<String, Vec<&PositionSample>> = positions
        .iter()
        .into_group_map_by(|position| position.device_id.clone())
        .into_iter()
        .collect();

    let mut trails = Trails::default();
    for (device_id, mut samples) in groups {
        samples.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        let results = classify(&device_id, &samples, gap_minutes, &mut trails.warnings);
        let segments = build_segments(&device_id, &samples, &results);
        trails.segments.insert(device_id, segments);
    }
    debug!(
        "segmented {} positions of {} devices into {} segments",
        positions.len(),
        trails.segments.len(),
        trails.segment_count()
    );
    Ok(trails)
}

// `samples` must be sorted.
fn classify(
    device_id: &str,
    samples: &[&PositionSample],
    gap_minutes: f64,
    warnings: &mut Vec<TrailWarning>,
) -> Vec<ProcessResult> {
    let mut report = |message: String| {
        warn!("[trail_segmenter] device {device_id}: {message}");
        warnings.push(TrailWarning {
            device_id: device_id.to_string(),
            message,
        });
    };
    let times: Vec<Option<ParsedTimestamp>> = samples
        .iter()
        .map(|sample| match parse_timestamp(&sample.timestamp) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                report(format!("{e}, treated as no gap"));
                None
            }
        })
        .collect();

    let mut results = Vec::with_capacity(samples.len());
    for (i, curr) in times.iter().enumerate() {
        if i == 0 {
            results.push(ProcessResult::NewSegment);
            continue;
        }
        let gap = match (&times[i - 1], curr) {
            // a local time cannot be compared with an instant
            (Some(prev), Some(curr)) if prev.has_offset != curr.has_offset => {
                report(format!(
                    "cannot compare {:?} with {:?} (only one has a UTC offset), treated as no gap",
                    samples[i - 1].timestamp, samples[i].timestamp
                ));
                0.0
            }
            (Some(prev), Some(curr)) => minutes_between(&prev.time, &curr.time),
            _ => 0.0,
        };
        results.push(if gap > gap_minutes {
            ProcessResult::NewSegment
        } else {
            ProcessResult::Append
        });
    }
    results
}

fn build_segments(
    device_id: &str,
    samples: &[&PositionSample],
    results: &[ProcessResult],
) -> Vec<TrailSegment> {
    let name = match samples.first() {
        Some(sample) => sample.name.clone(),
        None => return Vec::new(),
    };
    let mut segments = Vec::new();
    let mut current_segment: Vec<GeoPoint> = Vec::new();

    let close = |points: Vec<GeoPoint>, segments: &mut Vec<TrailSegment>| {
        // a single point does not make a line
        if points.len() >= 2 {
            segments.push(TrailSegment {
                device_id: device_id.to_string(),
                name: name.clone(),
                points,
            });
        }
    };

    for (sample, result) in samples.iter().zip(results) {
        if *result == ProcessResult::NewSegment && !current_segment.is_empty() {
            close(std::mem::take(&mut current_segment), &mut segments);
        }
        current_segment.push(sample.point());
    }
    close(current_segment, &mut segments);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(device_id: &str, timestamp: &str, latitude: f64) -> PositionSample {
        PositionSample {
            device_id: device_id.to_string(),
            name: format!("Team {device_id}"),
            timestamp: timestamp.to_string(),
            latitude,
            longitude: -9.5,
            altitude: None,
            speed: None,
            battery: None,
        }
    }

    #[test]
    fn rejects_bad_threshold() {
        let positions = vec![sample("a", "2024-06-01T10:00:00Z", 52.0)];
        assert!(segment(&positions, 0.0).is_err());
        assert!(segment(&positions, -1.0).is_err());
        assert!(segment(&positions, f64::NAN).is_err());
        assert!(segment(&positions, f64::INFINITY).is_err());
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let positions = vec![
            sample("a", "2024-06-01T10:00:00Z", 52.0),
            sample("a", "2024-06-01T10:01:00Z", 95.0),
        ];
        let err = segment(&positions, 5.0).unwrap_err();
        assert_eq!(err.to_string(), "position 1 has invalid latitude: 95");

        let mut empty_name = sample("a", "2024-06-01T10:00:00Z", 52.0);
        empty_name.name = String::new();
        assert!(segment(&[empty_name], 5.0).is_err());
    }

    #[test]
    fn blank_but_non_empty_ids_are_accepted() {
        let mut blank = sample(" ", "2024-06-01T10:00:00Z", 52.0);
        blank.name = " ".to_string();
        let trails = segment(&[blank], 5.0).unwrap();
        assert_eq!(trails.segments.get(" "), Some(&Vec::new()));
    }

    #[test]
    fn single_sample_device_has_no_segments() {
        let trails = segment(&[sample("a", "2024-06-01T10:00:00Z", 52.0)], 5.0).unwrap();
        assert_eq!(trails.segments.get("a"), Some(&Vec::new()));
        assert_eq!(trails.segment_count(), 0);
    }

    #[test]
    fn classify_measures_from_previous_sample() {
        let positions = [
            sample("a", "2024-06-01T10:00:00Z", 52.0),
            sample("a", "2024-06-01T10:04:00Z", 52.001),
            sample("a", "2024-06-01T10:08:00Z", 52.002),
            sample("a", "2024-06-01T10:14:00Z", 52.003),
        ];
        let refs: Vec<&PositionSample> = positions.iter().collect();
        let mut warnings = Vec::new();
        let results = classify("a", &refs, 5.0, &mut warnings);
        assert_eq!(
            results,
            vec![
                ProcessResult::NewSegment,
                ProcessResult::Append,
                ProcessResult::Append,
                ProcessResult::NewSegment,
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn gap_equal_to_threshold_does_not_split() {
        let positions = vec![
            sample("a", "2024-06-01T10:00:00Z", 52.0),
            sample("a", "2024-06-01T10:05:00Z", 52.001),
        ];
        let trails = segment(&positions, 5.0).unwrap();
        assert_eq!(trails.segments["a"].len(), 1);
        assert_eq!(trails.segments["a"][0].points.len(), 2);
    }
}
