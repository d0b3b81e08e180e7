pub mod test_utils;

use sar_field_core::trail_segmenter::{segment, DEFAULT_GAP_MINUTES};
use test_utils::{load_breadcrumbs_for_test, sample, walk};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn gap_splits_trail() {
    let positions = walk("7", &[0, 1, 2, 10]);
    let trails = segment(&positions, 5.0).unwrap();
    let segments = &trails.segments["7"];
    // the sample after the gap is left alone and dropped
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].points.len(), 3);
    assert_eq!(segments[0].points[2], positions[2].point());
    assert!(trails.warnings.is_empty());
}

#[test]
fn large_threshold_keeps_trail_whole() {
    let positions = walk("7", &[0, 1, 2, 10]);
    let trails = segment(&positions, 20.0).unwrap();
    assert_eq!(trails.segments["7"].len(), 1);
    assert_eq!(trails.segments["7"][0].points.len(), 4);
}

#[test]
fn malformed_timestamp_is_not_a_gap() {
    init_logger();
    let mut positions = walk("7", &[0, 1, 2, 3]);
    // sorts after the valid timestamps
    positions[3].timestamp = "2024-06-01T99:99".to_string();
    let trails = segment(&positions, 5.0).unwrap();
    assert_eq!(trails.segments["7"].len(), 1);
    assert_eq!(trails.segments["7"][0].points.len(), 4);
    assert_eq!(trails.warnings.len(), 1);
    assert_eq!(trails.warnings[0].device_id, "7");
    assert!(trails.warnings[0].message.contains("2024-06-01T99:99"));
}

#[test]
fn csv_export() {
    init_logger();
    let positions = load_breadcrumbs_for_test();
    assert_eq!(positions.len(), 12);

    let trails = segment(&positions, DEFAULT_GAP_MINUTES).unwrap();
    assert!(trails.warnings.is_empty());
    assert_eq!(
        trails.segments.keys().collect::<Vec<_>>(),
        vec!["1", "2", "3"]
    );

    let alpha = &trails.segments["1"];
    assert_eq!(alpha.len(), 2);
    assert_eq!(alpha[0].points.len(), 4);
    assert_eq!(alpha[1].points.len(), 3);
    assert!(alpha.iter().all(|s| s.name == "Team Alpha" && s.device_id == "1"));
    // sorted by time, not file order
    assert_eq!(alpha[0].points[0].latitude, 52.2704);
    assert_eq!(alpha[1].points[2].latitude, 52.2755);

    let dog = &trails.segments["2"];
    assert_eq!(dog.len(), 1);
    assert_eq!(dog[0].points.len(), 3);

    // a single sample never makes a segment
    assert!(trails.segments["3"].is_empty());
    assert_eq!(trails.segment_count(), 3);

    let trails = segment(&positions, 20.0).unwrap();
    assert_eq!(trails.segments["1"].len(), 1);
    assert_eq!(trails.segments["1"][0].points.len(), 7);
    assert_eq!(trails.segments["2"].len(), 1);
}

#[test]
fn mixed_offsets_are_compared_as_instants() {
    let positions = vec![
        sample("a", "A", "2024-06-01T10:00:00Z", 52.0, -9.0),
        // same instant as 10:03Z, written with an offset
        sample("a", "A", "2024-06-01T11:03:00+01:00", 52.001, -9.0),
    ];
    let trails = segment(&positions, 5.0).unwrap();
    assert_eq!(trails.segments["a"].len(), 1);
}

#[test]
fn local_and_offset_timestamps_are_not_compared() {
    init_logger();
    let mut positions = walk("7", &[0, 1, 20, 21]);
    // a local time between two instants
    positions[2].timestamp = "2024-06-01T10:20:00".to_string();
    let trails = segment(&positions, 5.0).unwrap();
    assert_eq!(trails.segments["7"].len(), 1);
    assert_eq!(trails.segments["7"][0].points.len(), 4);
    assert_eq!(trails.warnings.len(), 2);
    assert!(trails.warnings[0].message.contains("UTC offset"));

    // all local is fine
    let mut positions = walk("7", &[0, 1, 20, 21]);
    for position in &mut positions {
        position.timestamp = position.timestamp.trim_end_matches('Z').to_string();
    }
    let trails = segment(&positions, 5.0).unwrap();
    assert_eq!(trails.segments["7"].len(), 2);
    assert!(trails.warnings.is_empty());
}

#[test]
fn segment_name_comes_from_first_sample() {
    let positions = vec![
        sample("a", "Renamed", "2024-06-01T10:01:00Z", 52.001, -9.0),
        sample("a", "Original", "2024-06-01T10:00:00Z", 52.0, -9.0),
    ];
    let trails = segment(&positions, 5.0).unwrap();
    assert_eq!(trails.segments["a"][0].name, "Original");
}

#[test]
fn invalid_sample_rejects_batch() {
    let mut positions = load_breadcrumbs_for_test();
    positions[5].longitude = -181.0;
    let err = segment(&positions, 5.0).unwrap_err();
    assert!(err.to_string().contains("position 5"));

    let mut positions = load_breadcrumbs_for_test();
    positions[0].device_id = String::new();
    assert!(segment(&positions, 5.0).is_err());
}

#[test]
fn empty_batch() {
    let trails = segment(&[], 5.0).unwrap();
    assert!(trails.segments.is_empty());
    assert!(trails.warnings.is_empty());
}
