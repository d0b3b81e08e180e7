use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use uuid::Uuid;

use crate::geo_point::{GeoPoint, Polygon};

#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Tracking,
    Markers,
    Drawings,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

#[derive(Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    CurrentPositions,
    Breadcrumbs,
    IppLkp,
    Clues,
    Hazards,
    Lines,
    SearchAreas,
    RangeRings,
    BearingLines,
    SearchSectors,
    TextLabels,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::CurrentPositions => "Current Positions",
            Layer::Breadcrumbs => "Breadcrumbs",
            Layer::IppLkp => "IPP/LKP",
            Layer::Clues => "Clues",
            Layer::Hazards => "Hazards",
            Layer::Lines => "Lines",
            Layer::SearchAreas => "Search Areas",
            Layer::RangeRings => "Range Rings",
            Layer::BearingLines => "Bearing Lines",
            Layer::SearchSectors => "Search Sectors",
            Layer::TextLabels => "Text Labels",
        }
    }

    pub fn of_name(name: &str) -> Option<Self> {
        Layer::iter().find(|layer| layer.name() == name)
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::CurrentPositions | Layer::Breadcrumbs => LayerKind::Tracking,
            Layer::IppLkp | Layer::Clues | Layer::Hazards => LayerKind::Markers,
            Layer::Lines
            | Layer::SearchAreas
            | Layer::RangeRings
            | Layer::BearingLines
            | Layer::SearchSectors
            | Layer::TextLabels => LayerKind::Drawings,
        }
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Layer::CurrentPositions
            | Layer::IppLkp
            | Layer::Clues
            | Layer::Hazards
            | Layer::TextLabels => GeometryType::Point,
            Layer::Breadcrumbs | Layer::Lines | Layer::BearingLines => GeometryType::LineString,
            Layer::SearchAreas | Layer::RangeRings | Layer::SearchSectors => GeometryType::Polygon,
        }
    }
}

impl LayerKind {
    pub fn layers(&self) -> Vec<Layer> {
        Layer::iter().filter(|layer| layer.kind() == *self).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    LineString(Vec<GeoPoint>),
    Polygon(Polygon),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub id: Uuid,
    pub layer: Layer,
    pub geometry: Geometry,
    pub attributes: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Feature {
    /// `attributes` must be a JSON object.
    pub fn new(layer: Layer, geometry: Geometry, attributes: Value) -> Result<Self> {
        let attributes = match attributes {
            Value::Object(map) => map,
            other => bail!("feature attributes must be an object, got {other}"),
        };
        let feature = Feature {
            id: Uuid::new_v4(),
            layer,
            geometry,
            attributes,
            created_at: Utc::now(),
        };
        feature.check_geometry()?;
        Ok(feature)
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn check_geometry(&self) -> Result<()> {
        let expected = self.layer.geometry_type();
        let actual = self.geometry.geometry_type();
        if expected != actual {
            bail!(
                "layer \"{}\" holds {:?} features, got {:?}",
                self.layer.name(),
                expected,
                actual
            );
        }
        Ok(())
    }
}

/// The storage a host GIS provides for our features.
pub trait FeatureStore {
    /// Creates the layer when it does not exist yet.
    fn ensure_layer(&mut self, layer: Layer) -> Result<()>;

    /// Inserts the features, replacing existing ones with the same id.
    fn upsert_features(&mut self, features: Vec<Feature>) -> Result<Vec<Uuid>>;

    /// Drops every feature of the layer and stores `features` instead.
    ///
    /// Each call is atomic for its own layer only. Callers replacing several
    /// layers in a row (see `tracking::refresh_tracking`) leave the earlier
    /// layers updated when a later call fails, so implementations should
    /// reject bad input before touching the layer.
    fn replace_features(&mut self, layer: Layer, features: Vec<Feature>) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryFeatureStore {
    layers: BTreeMap<Layer, Vec<Feature>>,
}

impl MemoryFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains_key(&layer)
    }

    pub fn features(&self, layer: Layer) -> &[Feature] {
        self.layers.get(&layer).map(|f| f.as_slice()).unwrap_or(&[])
    }

    pub fn get(&self, id: &Uuid) -> Option<&Feature> {
        self.layers
            .values()
            .flat_map(|features| features.iter())
            .find(|feature| feature.id == *id)
    }

    fn layer_mut(&mut self, layer: Layer) -> Result<&mut Vec<Feature>> {
        self.layers
            .get_mut(&layer)
            .ok_or_else(|| anyhow!("layer \"{}\" does not exist", layer.name()))
    }
}

impl FeatureStore for MemoryFeatureStore {
    fn ensure_layer(&mut self, layer: Layer) -> Result<()> {
        self.layers.entry(layer).or_default();
        Ok(())
    }

    fn upsert_features(&mut self, features: Vec<Feature>) -> Result<Vec<Uuid>> {
        // all-or-nothing
        for feature in &features {
            feature.check_geometry()?;
            if !self.has_layer(feature.layer) {
                bail!("layer \"{}\" does not exist", feature.layer.name());
            }
        }
        let mut ids = Vec::with_capacity(features.len());
        for feature in features {
            ids.push(feature.id);
            let layer = self.layer_mut(feature.layer)?;
            match layer.iter().position(|f| f.id == feature.id) {
                Some(i) => layer[i] = feature,
                None => layer.push(feature),
            }
        }
        Ok(ids)
    }

    fn replace_features(&mut self, layer: Layer, features: Vec<Feature>) -> Result<()> {
        for feature in &features {
            if feature.layer != layer {
                bail!(
                    "feature for layer \"{}\" passed to \"{}\"",
                    feature.layer.name(),
                    layer.name()
                );
            }
            feature.check_geometry()?;
        }
        *self.layer_mut(layer)? = features;
        Ok(())
    }
}
