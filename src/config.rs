use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::geodesic::DEFAULT_CIRCLE_SEGMENTS;
use crate::sector::DEFAULT_SECTOR_SEGMENTS;
use crate::trail_segmenter::DEFAULT_GAP_MINUTES;

// unit: meter
pub const DEFAULT_MAX_RADIUS_M: f64 = 100_000.0;
// west is negative, Ireland ~2024
pub const DEFAULT_MAGNETIC_DECLINATION_DEG: f64 = -4.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub gap_minutes: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        TrailConfig {
            gap_minutes: DEFAULT_GAP_MINUTES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub circle_segments: usize,
    pub sector_segments: usize,
    pub max_radius_m: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
            sector_segments: DEFAULT_SECTOR_SEGMENTS,
            max_radius_m: DEFAULT_MAX_RADIUS_M,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BearingConfig {
    pub magnetic_declination_deg: f64,
}

impl Default for BearingConfig {
    fn default() -> Self {
        BearingConfig {
            magnetic_declination_deg: DEFAULT_MAGNETIC_DECLINATION_DEG,
        }
    }
}

/// Settings shared by the drawing builders and the tracking refresh. Every
/// field is optional in the JSON form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarConfig {
    pub trail: TrailConfig,
    pub geometry: GeometryConfig,
    pub bearing: BearingConfig,
}

impl SarConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config {}: {e}", path.display()))?;
        let config = Self::from_json_str(&json)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let gap = self.trail.gap_minutes;
        if !gap.is_finite() || gap <= 0.0 {
            bail!("trail.gap_minutes must be positive, got {gap}");
        }
        if self.geometry.circle_segments < 3 {
            bail!(
                "geometry.circle_segments must be at least 3, got {}",
                self.geometry.circle_segments
            );
        }
        if self.geometry.sector_segments == 0 {
            bail!("geometry.sector_segments must be at least 1");
        }
        let max_radius = self.geometry.max_radius_m;
        if !max_radius.is_finite() || max_radius <= 0.0 {
            bail!("geometry.max_radius_m must be positive, got {max_radius}");
        }
        let declination = self.bearing.magnetic_declination_deg;
        if !(-180.0..=180.0).contains(&declination) {
            bail!("bearing.magnetic_declination_deg out of range: {declination}");
        }
        Ok(())
    }

    /// Checks a radius or distance against `(0, max_radius_m]`.
    pub fn check_distance(&self, what: &str, meters: f64) -> Result<()> {
        if !meters.is_finite() || meters <= 0.0 {
            bail!("{what} must be positive, got {meters}");
        }
        if meters > self.geometry.max_radius_m {
            bail!(
                "{what} must not exceed {}m, got {meters}",
                self.geometry.max_radius_m
            );
        }
        Ok(())
    }
}
