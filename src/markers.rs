use anyhow::Result;
use serde_json::{json, Map, Value};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::feature_store::{Feature, Geometry, Layer};
use crate::geo_point::GeoPoint;

// Irish Transverse Mercator bounds, unit: meter
const MAX_GRID_EASTING: f64 = 1_000_000.0;
const MAX_GRID_NORTHING: f64 = 1_500_000.0;

#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum Confidence {
    Confirmed,
    Probable,
    Possible,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Confirmed => "Confirmed",
            Confidence::Probable => "Probable",
            Confidence::Possible => "Possible",
        }
    }

    pub fn of_str(name: &str) -> Option<Self> {
        Confidence::iter().find(|value| value.as_str() == name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn of_str(name: &str) -> Option<Self> {
        Severity::iter().find(|value| value.as_str() == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MarkerKind {
    /// Initial planning point / last known position.
    IppLkp { subject_category: String },
    Clue {
        clue_type: String,
        confidence: Confidence,
    },
    Hazard {
        hazard_type: String,
        severity: Severity,
    },
}

impl MarkerKind {
    pub fn layer(&self) -> Layer {
        match self {
            MarkerKind::IppLkp { .. } => Layer::IppLkp,
            MarkerKind::Clue { .. } => Layer::Clues,
            MarkerKind::Hazard { .. } => Layer::Hazards,
        }
    }

    pub fn clue(clue_type: &str) -> Self {
        MarkerKind::Clue {
            clue_type: clue_type.to_string(),
            confidence: Confidence::Possible,
        }
    }

    pub fn hazard(hazard_type: &str) -> Self {
        MarkerKind::Hazard {
            hazard_type: hazard_type.to_string(),
            severity: Severity::Medium,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub name: String,
    pub kind: MarkerKind,
    pub location: GeoPoint,
    pub description: String,
    pub irish_grid_e: Option<f64>,
    pub irish_grid_n: Option<f64>,
}

impl Marker {
    pub fn new(name: &str, kind: MarkerKind, location: GeoPoint) -> Self {
        Marker {
            name: name.to_string(),
            kind,
            location,
            description: String::new(),
            irish_grid_e: None,
            irish_grid_n: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("marker name cannot be empty");
        }
        self.location.validate()?;
        if let Some(e) = self.irish_grid_e {
            if !(0.0..=MAX_GRID_EASTING).contains(&e) {
                bail!("invalid Irish Grid easting: {e} (must be 0 to {MAX_GRID_EASTING})");
            }
        }
        if let Some(n) = self.irish_grid_n {
            if !(0.0..=MAX_GRID_NORTHING).contains(&n) {
                bail!("invalid Irish Grid northing: {n} (must be 0 to {MAX_GRID_NORTHING})");
            }
        }
        Ok(())
    }

    pub fn to_feature(&self) -> Result<Feature> {
        self.validate()?;
        let mut attributes = Map::new();
        let mut set = |key: &str, value: Value| {
            attributes.insert(key.to_string(), value);
        };
        set("name", json!(self.name.trim()));
        match &self.kind {
            MarkerKind::IppLkp { subject_category } => {
                set("subject_category", json!(subject_category));
            }
            MarkerKind::Clue {
                clue_type,
                confidence,
            } => {
                set("clue_type", json!(clue_type));
                set("confidence", json!(confidence.as_str()));
            }
            MarkerKind::Hazard {
                hazard_type,
                severity,
            } => {
                set("hazard_type", json!(hazard_type));
                set("severity", json!(severity.as_str()));
            }
        }
        set("description", json!(self.description));
        set("lat", json!(self.location.latitude));
        set("lon", json!(self.location.longitude));
        set("irish_grid_e", json!(self.irish_grid_e));
        set("irish_grid_n", json!(self.irish_grid_n));
        Feature::new(
            self.kind.layer(),
            Geometry::Point(self.location),
            Value::Object(attributes),
        )
    }
}
