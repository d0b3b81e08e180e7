use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            bail!(
                "invalid latitude: {} (must be -90 to 90)",
                self.latitude
            );
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            bail!(
                "invalid longitude: {} (must be -180 to 180)",
                self.longitude
            );
        }
        Ok(())
    }

    // e.g. "52.2704°N, 9.5456°W"
    pub fn format_wgs84(&self) -> String {
        let lat_dir = if self.latitude >= 0. { 'N' } else { 'S' };
        let lon_dir = if self.longitude >= 0. { 'E' } else { 'W' };
        format!(
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}

// geo-types uses (x, y) = (lng, lat)
impl From<GeoPoint> for geo_types::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo_types::Point::new(point.longitude, point.latitude)
    }
}

impl From<geo_types::Point<f64>> for GeoPoint {
    fn from(point: geo_types::Point<f64>) -> Self {
        GeoPoint {
            latitude: point.y(),
            longitude: point.x(),
        }
    }
}

/// A closed ring of points. The last point always equals the first one.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    ring: Vec<GeoPoint>,
}

impl Polygon {
    /// Builds a polygon from user supplied vertices, closing the ring when the
    /// caller did not repeat the first vertex.
    pub fn from_vertices(vertices: &[GeoPoint]) -> Result<Self> {
        for (i, vertex) in vertices.iter().enumerate() {
            vertex
                .validate()
                .map_err(|e| anyhow!("vertex {i} is invalid: {e}"))?;
        }
        let distinct = distinct_count(vertices);
        if distinct < 3 {
            bail!("a polygon needs at least 3 distinct vertices, got {distinct}");
        }
        let mut ring = vertices.to_vec();
        if ring.first() != ring.last() {
            ring.push(ring[0]);
        }
        Ok(Polygon { ring })
    }

    // Used for generated rings (circles, sectors) which are closed by construction.
    pub(crate) fn from_closed_ring(ring: Vec<GeoPoint>) -> Self {
        debug_assert!(ring.first() == ring.last());
        Polygon { ring }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.ring
    }

    pub fn distinct_vertex_count(&self) -> usize {
        distinct_count(&self.ring)
    }

    pub fn to_geo(&self) -> geo_types::Polygon<f64> {
        let exterior: geo_types::LineString<f64> = self
            .ring
            .iter()
            .map(|p| geo_types::Coord {
                x: p.longitude,
                y: p.latitude,
            })
            .collect();
        geo_types::Polygon::new(exterior, vec![])
    }
}

fn distinct_count(points: &[GeoPoint]) -> usize {
    points
        .iter()
        .enumerate()
        .filter(|(i, p)| !points[..*i].contains(p))
        .count()
}
