use sar_field_core::geo_point::GeoPoint;
use sar_field_core::trail_segmenter::PositionSample;

// Roughly the car park at the foot of Carrauntoohil.
pub const BASE_LAT: f64 = 52.2704;
pub const BASE_LNG: f64 = -9.5456;

pub fn base() -> GeoPoint {
    GeoPoint::new(BASE_LAT, BASE_LNG)
}

fn parse_optional(value: Option<&str>) -> Option<f64> {
    value.filter(|v| !v.is_empty()).map(|v| v.parse().unwrap())
}

/// Breadcrumbs of three devices in export order (not sorted by time).
pub fn load_breadcrumbs_for_test() -> Vec<PositionSample> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path("./tests/data/breadcrumbs.csv")
        .unwrap();

    let mut data = Vec::new();
    for row in reader.records() {
        let row = row.unwrap();
        data.push(PositionSample {
            device_id: row.get(0).unwrap().to_string(),
            name: row.get(1).unwrap().to_string(),
            timestamp: row.get(2).unwrap().to_string(),
            latitude: row.get(3).unwrap().parse().unwrap(),
            longitude: row.get(4).unwrap().parse().unwrap(),
            altitude: parse_optional(row.get(5)),
            speed: parse_optional(row.get(6)),
            battery: parse_optional(row.get(7)),
        });
    }
    data
}

pub fn sample(device_id: &str, name: &str, timestamp: &str, lat: f64, lng: f64) -> PositionSample {
    PositionSample {
        device_id: device_id.to_string(),
        name: name.to_string(),
        timestamp: timestamp.to_string(),
        latitude: lat,
        longitude: lng,
        altitude: None,
        speed: None,
        battery: None,
    }
}

/// One sample per given minute offset after 10:00 UTC, walking north-east.
pub fn walk(device_id: &str, minutes: &[u32]) -> Vec<PositionSample> {
    minutes
        .iter()
        .enumerate()
        .map(|(i, minute)| {
            sample(
                device_id,
                "Walker",
                &format!("2024-06-01T10:{minute:02}:00Z"),
                BASE_LAT + 0.0005 * i as f64,
                BASE_LNG + 0.0005 * i as f64,
            )
        })
        .collect()
}
