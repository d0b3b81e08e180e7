use anyhow::Result;

use crate::config::SarConfig;
use crate::geo_point::GeoPoint;
use crate::geodesic::{destination_point, normalize_bearing};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BearingReference {
    True,
    Magnetic,
}

impl BearingReference {
    pub fn as_str(&self) -> &'static str {
        match self {
            BearingReference::True => "True",
            BearingReference::Magnetic => "Magnetic",
        }
    }
}

// Declination is negative for west, e.g. -4.5 for Ireland.
pub fn magnetic_to_true(magnetic_bearing: f64, declination: f64) -> f64 {
    normalize_bearing(magnetic_bearing - declination)
}

pub fn true_to_magnetic(true_bearing: f64, declination: f64) -> f64 {
    normalize_bearing(true_bearing + declination)
}

#[derive(Clone, Debug, PartialEq)]
pub struct BearingLineRequest {
    pub origin: GeoPoint,
    pub name: Option<String>,
    pub bearing: f64,
    pub reference: BearingReference,
    pub distance_m: f64,
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BearingLine {
    pub name: String,
    pub origin: GeoPoint,
    pub endpoint: GeoPoint,
    // always stored as true bearing
    pub true_bearing: f64,
    pub magnetic_bearing: f64,
    pub input_bearing: f64,
    pub reference: BearingReference,
    pub distance_m: f64,
    pub label: String,
    pub color: Option<String>,
}

pub fn plan_bearing_line(request: &BearingLineRequest, config: &SarConfig) -> Result<BearingLine> {
    request.origin.validate()?;
    if !request.bearing.is_finite() {
        bail!("bearing must be a finite number, got {}", request.bearing);
    }
    config.check_distance("distance", request.distance_m)?;

    let declination = config.bearing.magnetic_declination_deg;
    let (true_bearing, magnetic_bearing) = match request.reference {
        BearingReference::True => (
            normalize_bearing(request.bearing),
            true_to_magnetic(request.bearing, declination),
        ),
        BearingReference::Magnetic => (
            magnetic_to_true(request.bearing, declination),
            normalize_bearing(request.bearing),
        ),
    };
    let name = match &request.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => "Bearing Line".to_string(),
    };
    let label = format!(
        "{:.1}° ({}), {:.0}m",
        request.bearing,
        request.reference.as_str(),
        request.distance_m
    );
    Ok(BearingLine {
        name,
        origin: request.origin,
        endpoint: destination_point(request.origin, true_bearing, request.distance_m),
        true_bearing,
        magnetic_bearing,
        input_bearing: request.bearing,
        reference: request.reference,
        distance_m: request.distance_m,
        label,
        color: request.color.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declination() {
        assert_eq!(magnetic_to_true(90.0, -4.5), 94.5);
        assert_eq!(true_to_magnetic(94.5, -4.5), 90.0);
        assert_eq!(magnetic_to_true(357.0, -4.5), 1.5);
        assert_eq!(true_to_magnetic(2.0, -4.5), 357.5);
    }

    #[test]
    fn magnetic_request() {
        let request = BearingLineRequest {
            origin: GeoPoint::new(52.2704, -9.5456),
            name: Some("  ".to_string()),
            bearing: 90.0,
            reference: BearingReference::Magnetic,
            distance_m: 2500.0,
            color: None,
        };
        let line = plan_bearing_line(&request, &SarConfig::default()).unwrap();
        assert_eq!(line.name, "Bearing Line");
        assert_eq!(line.true_bearing, 94.5);
        assert_eq!(line.magnetic_bearing, 90.0);
        assert_eq!(line.label, "90.0° (Magnetic), 2500m");
        // a bit south of due east
        assert!(line.endpoint.latitude < request.origin.latitude);
        assert!(line.endpoint.longitude > request.origin.longitude);
    }

    #[test]
    fn distance_limits() {
        let mut request = BearingLineRequest {
            origin: GeoPoint::new(52.2704, -9.5456),
            name: None,
            bearing: 10.0,
            reference: BearingReference::True,
            distance_m: 0.0,
            color: None,
        };
        assert!(plan_bearing_line(&request, &SarConfig::default()).is_err());
        request.distance_m = 100_000.5;
        assert!(plan_bearing_line(&request, &SarConfig::default()).is_err());
        request.distance_m = 100_000.0;
        assert!(plan_bearing_line(&request, &SarConfig::default()).is_ok());
    }
}
