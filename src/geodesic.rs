/* Geodesic calculations on the WGS84 ellipsoid.

Range rings and bearing lines share `destination_point`, which uses the
latitude dependent earth radius below with the spherical direct formula.
Distances, lengths and areas are measured on the ellipsoid itself, so a
generated point measured back with `distance_between` is off by up to ~0.6%
of the requested distance. `local_radius_distance` is the exact inverse.
*/
use crate::geo_point::{GeoPoint, Polygon};
use geo::orient::{Direction, Orient};
use geo::{Distance, Geodesic, GeodesicArea};

// semi-major axis (equatorial radius), unit: meter
pub const WGS84_A: f64 = 6378137.0;
pub const WGS84_F: f64 = 1.0 / 298.257223563;
// semi-minor axis (polar radius), unit: meter
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

pub const DEFAULT_CIRCLE_SEGMENTS: usize = 64;

const IDENTICAL_POINT_EPSILON: f64 = 1e-9;

/// Normalizes a bearing into [0, 360).
pub fn normalize_bearing(bearing: f64) -> f64 {
    let normalized = bearing.rem_euclid(360.0);
    // `rem_euclid` rounds tiny negative values up to 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Earth radius at the given latitude (degrees), accounting for the oblate
/// shape of the ellipsoid.
pub fn local_earth_radius(latitude: f64) -> f64 {
    let lat_rad = latitude.to_radians();
    let cos_lat = lat_rad.cos();
    let sin_lat = lat_rad.sin();
    let numerator = (WGS84_A * WGS84_A * cos_lat).powi(2) + (WGS84_B * WGS84_B * sin_lat).powi(2);
    let denominator = (WGS84_A * cos_lat).powi(2) + (WGS84_B * sin_lat).powi(2);
    (numerator / denominator).sqrt()
}

// Spherical direct problem. All angles in radians.
pub(crate) fn spherical_destination(
    lat1: f64,
    lon1: f64,
    bearing_rad: f64,
    angular_distance: f64,
) -> GeoPoint {
    let sin_lat2 = lat1.sin() * angular_distance.cos()
        + lat1.cos() * angular_distance.sin() * bearing_rad.cos();
    // floating point drift near the poles can push this slightly past 1
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + f64::atan2(
            bearing_rad.sin() * angular_distance.sin() * lat1.cos(),
            angular_distance.cos() - lat1.sin() * lat2.sin(),
        );
    GeoPoint {
        latitude: lat2.to_degrees(),
        longitude: lon2.to_degrees(),
    }
}

/// Point reached by travelling `distance_m` meters from `origin` along the
/// initial `bearing` (degrees clockwise from true north).
///
/// Intended for distances up to 100 km. The longitude is not wrapped into
/// [-180, 180].
pub fn destination_point(origin: GeoPoint, bearing: f64, distance_m: f64) -> GeoPoint {
    if distance_m == 0.0 {
        return origin;
    }
    let angular_distance = distance_m / local_earth_radius(origin.latitude);
    spherical_destination(
        origin.latitude.to_radians(),
        origin.longitude.to_radians(),
        bearing.to_radians(),
        angular_distance,
    )
}

/// Initial bearing from `p1` to `p2` in [0, 360). Identical points give 0.
pub fn bearing_between(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let d_lat = p2.latitude - p1.latitude;
    let d_lon = p2.longitude - p1.longitude;
    if d_lon.abs() < IDENTICAL_POINT_EPSILON && d_lat.abs() < IDENTICAL_POINT_EPSILON {
        return 0.0;
    }
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let d_lon = d_lon.to_radians();
    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    normalize_bearing(f64::atan2(x, y).to_degrees())
}

/// Ellipsoidal (WGS84) geodesic distance in meters.
pub fn distance_between(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let origin: geo_types::Point<f64> = p1.into();
    let destination: geo_types::Point<f64> = p2.into();
    Geodesic::distance(origin, destination)
}

/// Great-circle distance on the sphere used by `destination_point` at the
/// latitude of `p1`, i.e. the exact inverse of `destination_point`.
pub fn local_radius_distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (p2.longitude - p1.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * f64::atan2(a.sqrt(), (1.0 - a).sqrt());
    c * local_earth_radius(p1.latitude)
}

/// Closed ring approximating a circle of `radius_m` around `center`. The
/// ring has `segments + 1` points; the first and the last coincide.
/// `segments` below 3 is raised to 3.
pub fn circle_polygon(center: GeoPoint, radius_m: f64, segments: usize) -> Polygon {
    let segments = segments.max(3);
    let mut ring: Vec<GeoPoint> = (0..=segments)
        .map(|i| {
            let bearing = (360.0 * i as f64) / segments as f64;
            destination_point(center, bearing, radius_m)
        })
        .collect();
    // 0° and 360° only differ by rounding noise
    ring[segments] = ring[0];
    Polygon::from_closed_ring(ring)
}

/// Ellipsoidal area in m^2, whatever the winding of the ring.
pub fn polygon_area(polygon: &Polygon) -> f64 {
    // a clockwise exterior is read as enclosing the rest of the globe
    polygon
        .to_geo()
        .orient(Direction::Default)
        .geodesic_area_unsigned()
}

/// Ellipsoidal length of a polyline in meters.
pub fn line_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_between(pair[0], pair[1]))
        .sum()
}
