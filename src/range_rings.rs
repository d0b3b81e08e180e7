use anyhow::Result;

use crate::config::SarConfig;
use crate::lpb_statistics::{self, PERCENTILES};

pub const MAX_MANUAL_RINGS: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub enum RingPlan {
    /// `ring_count` evenly spaced rings, the outermost at `radius_m`.
    Manual { radius_m: f64, ring_count: usize },
    /// One ring per LPB percentile of the category with this display name.
    Lpb { display_name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlannedRing {
    pub name: String,
    pub radius_m: f64,
    pub label: String,
    pub color: String,
    pub lpb_category: Option<&'static str>,
    pub percentile: Option<u32>,
}

pub fn lpb_ring_color(percentile: u32) -> &'static str {
    match percentile {
        25 => "#00FF00",
        50 => "#FFFF00",
        75 => "#FFA500",
        95 => "#FF0000",
        _ => "#FFA500",
    }
}

// light to dark orange from the innermost ring outwards
pub fn manual_ring_color(index: usize, total: usize) -> String {
    if total <= 1 {
        return "#FFA500".to_string();
    }
    let brightness = 255 - ((index as f64 / (total - 1) as f64) * 155.0) as u32;
    format!("#{brightness:02x}a500")
}

/// Expands a ring plan into the rings to draw, innermost first.
pub fn plan_rings(plan: &RingPlan, config: &SarConfig) -> Result<Vec<PlannedRing>> {
    match plan {
        RingPlan::Manual {
            radius_m,
            ring_count,
        } => {
            config.check_distance("radius", *radius_m)?;
            if !(1..=MAX_MANUAL_RINGS).contains(ring_count) {
                bail!("ring count must be between 1 and {MAX_MANUAL_RINGS}, got {ring_count}");
            }
            Ok((0..*ring_count)
                .map(|i| {
                    let radius_m = radius_m * (i + 1) as f64 / *ring_count as f64;
                    let label = format!("{radius_m:.0}m");
                    PlannedRing {
                        name: format!("Range Ring {label}"),
                        radius_m,
                        label,
                        color: manual_ring_color(i, *ring_count),
                        lpb_category: None,
                        percentile: None,
                    }
                })
                .collect())
        }
        RingPlan::Lpb { display_name } => {
            let category_key = lpb_statistics::get_category_from_display_name(display_name)
                .ok_or_else(|| anyhow!("unknown LPB category: {display_name}"))?;
            let distances = lpb_statistics::get_distances(category_key, &PERCENTILES)
                .unwrap_or_default();
            if distances.is_empty() {
                bail!("no LPB statistics for category: {display_name}");
            }
            // BTreeMap iterates in ascending percentile order
            Ok(distances
                .into_iter()
                .map(|(percentile, distance)| PlannedRing {
                    name: format!("{display_name} - {percentile}%"),
                    radius_m: distance as f64,
                    label: format!("{percentile}% ({distance}m)"),
                    color: lpb_ring_color(percentile).to_string(),
                    lpb_category: Some(category_key),
                    percentile: Some(percentile),
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_colors() {
        assert_eq!(manual_ring_color(0, 1), "#FFA500");
        assert_eq!(manual_ring_color(0, 3), "#ffa500");
        // 255 - 77
        assert_eq!(manual_ring_color(1, 3), "#b2a500");
        assert_eq!(manual_ring_color(2, 3), "#64a500");
    }

    #[test]
    fn single_manual_ring() {
        let plan = RingPlan::Manual {
            radius_m: 1500.0,
            ring_count: 1,
        };
        let rings = plan_rings(&plan, &SarConfig::default()).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].label, "1500m");
        assert_eq!(rings[0].name, "Range Ring 1500m");
        assert_eq!(rings[0].color, "#FFA500");
    }

    #[test]
    fn manual_limits() {
        let config = SarConfig::default();
        let plan = |radius_m, ring_count| RingPlan::Manual {
            radius_m,
            ring_count,
        };
        assert!(plan_rings(&plan(0.0, 1), &config).is_err());
        assert!(plan_rings(&plan(100_001.0, 1), &config).is_err());
        assert!(plan_rings(&plan(1000.0, 0), &config).is_err());
        assert!(plan_rings(&plan(1000.0, 11), &config).is_err());
        assert_eq!(plan_rings(&plan(1000.0, 10), &config).unwrap().len(), 10);
    }
}
