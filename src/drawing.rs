/* Builders for the drawing layers.

Each builder validates its input, computes the geometry through `geodesic` /
`sector` and returns a `Feature` ready for a `FeatureStore`. `add_features`
does the storing.
*/
use std::collections::BTreeSet;

use anyhow::Result;
use serde_json::json;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use uuid::Uuid;

use crate::bearing_line::{plan_bearing_line, BearingLineRequest};
use crate::config::SarConfig;
use crate::feature_store::{Feature, FeatureStore, Geometry, Layer};
use crate::geo_point::{GeoPoint, Polygon};
use crate::geodesic::{bearing_between, circle_polygon, distance_between, line_length, polygon_area};
use crate::range_rings::{plan_rings, RingPlan};
use crate::sector::{compute_sector_area, sector_polygon};

pub const DEFAULT_LINE_COLOR: &str = "#FF0000";
pub const DEFAULT_SEARCH_AREA_COLOR: &str = "#0064FF";
pub const DEFAULT_BEARING_LINE_COLOR: &str = "#800080";
pub const DEFAULT_SECTOR_COLOR: &str = "#FF6464";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    Planned,
    Assigned,
    InProgress,
    Completed,
    Cleared,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Planned => "Planned",
            SearchStatus::Assigned => "Assigned",
            SearchStatus::InProgress => "InProgress",
            SearchStatus::Completed => "Completed",
            SearchStatus::Cleared => "Cleared",
        }
    }

    pub fn of_str(name: &str) -> Option<Self> {
        SearchStatus::iter().find(|value| value.as_str() == name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn of_str(name: &str) -> Option<Self> {
        Priority::iter().find(|value| value.as_str() == name)
    }
}

fn check_points(points: &[GeoPoint]) -> Result<()> {
    for (i, point) in points.iter().enumerate() {
        point
            .validate()
            .map_err(|e| anyhow!("point {i} is invalid: {e}"))?;
    }
    Ok(())
}

fn check_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("{what} cannot be empty");
    }
    Ok(())
}

pub fn line_feature(
    name: &str,
    points: &[GeoPoint],
    description: &str,
    color: &str,
    width: u32,
) -> Result<Feature> {
    check_name("line name", name)?;
    if points.len() < 2 {
        bail!("a line needs at least 2 points, got {}", points.len());
    }
    check_points(points)?;
    Feature::new(
        Layer::Lines,
        Geometry::LineString(points.to_vec()),
        json!({
            "name": name.trim(),
            "description": description,
            "color": color,
            "width": width,
            "distance_m": line_length(points),
        }),
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchArea {
    pub name: String,
    pub team: String,
    pub status: SearchStatus,
    pub priority: Priority,
    // probability of area, percent
    pub poa: f64,
    pub terrain: String,
    pub search_method: String,
    pub color: String,
    pub notes: String,
}

impl SearchArea {
    pub fn new(name: &str) -> Self {
        SearchArea {
            name: name.to_string(),
            team: "Unassigned".to_string(),
            status: SearchStatus::Planned,
            priority: Priority::Medium,
            poa: 50.0,
            terrain: String::new(),
            search_method: String::new(),
            color: DEFAULT_SEARCH_AREA_COLOR.to_string(),
            notes: String::new(),
        }
    }
}

pub fn search_area_feature(area: &SearchArea, vertices: &[GeoPoint]) -> Result<Feature> {
    check_name("search area name", &area.name)?;
    if !(0.0..=100.0).contains(&area.poa) {
        bail!("POA must be between 0 and 100, got {}", area.poa);
    }
    let polygon = Polygon::from_vertices(vertices)?;
    let area_sqkm = polygon_area(&polygon) / 1e6;
    Feature::new(
        Layer::SearchAreas,
        Geometry::Polygon(polygon),
        json!({
            "name": area.name.trim(),
            "team": area.team,
            "status": area.status.as_str(),
            "priority": area.priority.as_str(),
            "area_sqkm": area_sqkm,
            "POA": area.poa,
            // probability of detection, filled in once the area is searched
            "POD": 0.0,
            "terrain": area.terrain,
            "search_method": area.search_method,
            "color": area.color,
            "start_time": "",
            "end_time": "",
            "notes": area.notes,
        }),
    )
}

/// One polygon feature per ring of the plan, innermost first.
pub fn range_ring_features(
    center: GeoPoint,
    plan: &RingPlan,
    config: &SarConfig,
) -> Result<Vec<Feature>> {
    center.validate()?;
    plan_rings(plan, config)?
        .into_iter()
        .map(|ring| {
            let circle = circle_polygon(center, ring.radius_m, config.geometry.circle_segments);
            Feature::new(
                Layer::RangeRings,
                Geometry::Polygon(circle),
                json!({
                    "name": ring.name,
                    "center_lat": center.latitude,
                    "center_lon": center.longitude,
                    "radius_m": ring.radius_m,
                    "label": ring.label,
                    "color": ring.color,
                    "lpb_category": ring.lpb_category.unwrap_or(""),
                    "percentile": ring.percentile.unwrap_or(0),
                }),
            )
        })
        .collect()
}

pub fn bearing_line_feature(request: &BearingLineRequest, config: &SarConfig) -> Result<Feature> {
    let line = plan_bearing_line(request, config)?;
    Feature::new(
        Layer::BearingLines,
        Geometry::LineString(vec![line.origin, line.endpoint]),
        json!({
            "name": line.name,
            "origin_lat": line.origin.latitude,
            "origin_lon": line.origin.longitude,
            "bearing": line.true_bearing,
            "bearing_input": line.input_bearing,
            "bearing_type": line.reference.as_str(),
            "magnetic_bearing": line.magnetic_bearing,
            "distance_m": line.distance_m,
            "label": line.label,
            "color": line.color.as_deref().unwrap_or(DEFAULT_BEARING_LINE_COLOR),
        }),
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectorRequest {
    pub name: String,
    pub center: GeoPoint,
    pub start_bearing: f64,
    pub end_bearing: f64,
    pub radius_m: f64,
    pub priority: Priority,
    pub color: String,
}

impl SectorRequest {
    pub fn new(
        name: &str,
        center: GeoPoint,
        start_bearing: f64,
        end_bearing: f64,
        radius_m: f64,
    ) -> Self {
        SectorRequest {
            name: name.to_string(),
            center,
            start_bearing,
            end_bearing,
            radius_m,
            priority: Priority::Medium,
            color: DEFAULT_SECTOR_COLOR.to_string(),
        }
    }
}

pub fn sector_feature(request: &SectorRequest, config: &SarConfig) -> Result<Feature> {
    check_name("sector name", &request.name)?;
    request.center.validate()?;
    for bearing in [request.start_bearing, request.end_bearing] {
        if !bearing.is_finite() {
            bail!("sector bearing must be a finite number, got {bearing}");
        }
    }
    config.check_distance("sector radius", request.radius_m)?;

    let polygon = sector_polygon(
        request.center,
        request.radius_m,
        request.start_bearing,
        request.end_bearing,
        config.geometry.sector_segments,
    );
    let area_sqkm = polygon_area(&polygon) / 1e6;
    let nominal_area_sqkm =
        compute_sector_area(request.radius_m, request.start_bearing, request.end_bearing);
    Feature::new(
        Layer::SearchSectors,
        Geometry::Polygon(polygon),
        json!({
            "name": request.name.trim(),
            "center_lat": request.center.latitude,
            "center_lon": request.center.longitude,
            "start_bearing": request.start_bearing,
            "end_bearing": request.end_bearing,
            "radius_m": request.radius_m,
            "area_sqkm": area_sqkm,
            "nominal_area_sqkm": nominal_area_sqkm,
            "priority": request.priority.as_str(),
            "color": request.color,
        }),
    )
}

pub fn text_label_feature(
    text: &str,
    location: GeoPoint,
    font_size: u32,
    color: &str,
    rotation: f64,
) -> Result<Feature> {
    check_name("label text", text)?;
    location.validate()?;
    if font_size == 0 {
        bail!("font size must be positive");
    }
    Feature::new(
        Layer::TextLabels,
        Geometry::Point(location),
        json!({
            "text": text,
            "lat": location.latitude,
            "lon": location.longitude,
            "font_size": font_size,
            "color": color,
            "rotation": rotation,
        }),
    )
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    pub distance_m: f64,
    pub distance_km: f64,
    pub bearing: f64,
}

pub fn measure(p1: GeoPoint, p2: GeoPoint) -> Result<Measurement> {
    check_points(&[p1, p2])?;
    let distance_m = distance_between(p1, p2);
    Ok(Measurement {
        distance_m,
        distance_km: distance_m / 1000.0,
        bearing: bearing_between(p1, p2),
    })
}

/// Stores the features, creating their layers on first use.
pub fn add_features<S: FeatureStore>(store: &mut S, features: Vec<Feature>) -> Result<Vec<Uuid>> {
    let layers: BTreeSet<Layer> = features.iter().map(|feature| feature.layer).collect();
    for layer in layers {
        store.ensure_layer(layer)?;
    }
    let ids = store.upsert_features(features)?;
    info!("[drawing] stored {} features", ids.len());
    Ok(ids)
}
