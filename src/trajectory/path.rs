//! Path generation by repeated great-circle stepping
//!
//! A path starts at a random origin, heads in a random direction, and every step
//! advances the previous waypoint by a fixed distance along the current heading.
//! The heading is nudged every [`HEADING_PERTURBATION_INTERVAL`] steps.

use geo::{Destination, Haversine, Point};
use rand::Rng;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::trace;

/// Mean Earth radius in kilometers, the radius [`Haversine`] measures on
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// The heading changes on every step index divisible by this value
pub const HEADING_PERTURBATION_INTERVAL: usize = 20;

/// Heading perturbations are drawn from `[-MAX_HEADING_DELTA, MAX_HEADING_DELTA)` degrees
pub const MAX_HEADING_DELTA: f64 = 30.0;

/// Longitude range of the first waypoint, in degrees
///
/// Narrower than the full globe; every generated path starts inside this band.
pub const ORIGIN_LONGITUDE: (f64, f64) = (-90.0, 90.0);

/// Latitude range of the first waypoint, in degrees
pub const ORIGIN_LATITUDE: (f64, f64) = (-45.0, 45.0);

/// One point of a path: position plus the second it is reached at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Longitude in degrees
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Altitude, always 0 for generated paths
    pub altitude: f64,
    /// Epoch second at which the item is at this position
    pub timestamp: i64,
}

impl Waypoint {
    /// Create a waypoint at ground level
    pub fn new(longitude: f64, latitude: f64, timestamp: i64) -> Self {
        Self { longitude, latitude, altitude: 0.0, timestamp }
    }
}

// Serialized as a GeoJSON-style position `[lon, lat, alt, timestamp]`
impl Serialize for Waypoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.longitude, self.latitude, self.altitude, self.timestamp).serialize(serializer)
    }
}

/// Ordered, immutable polyline of waypoints
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
}

impl Path {
    /// All waypoints in order, origin first
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints (steps + 1)
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false for generated paths, which contain at least the origin
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of steps taken beyond the origin
    pub fn step_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// First waypoint
    pub fn origin(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    /// Last waypoint
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Seconds between the first and last waypoint
    pub fn span_seconds(&self) -> i64 {
        match (self.waypoints.first(), self.waypoints.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0,
        }
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Path", 2)?;
        state.serialize_field("type", "linestring")?;
        state.serialize_field("coordinates", &self.waypoints)?;
        state.end()
    }
}

/// Number of steps a path covering `start_time..end_time` takes at `resolution`
///
/// `resolution` must be positive.
pub fn step_count(start_time: i64, end_time: i64, resolution: i64) -> usize {
    debug_assert!(resolution > 0, "path resolution must be positive");
    if end_time <= start_time {
        return 0;
    }
    ((end_time - start_time) / resolution) as usize
}

/// Point reached by travelling `distance_km` from `(longitude, latitude)` along
/// `bearing_deg` on a sphere
///
/// Returns `(longitude, latitude)` in degrees. Longitude is not normalized.
pub fn destination(longitude: f64, latitude: f64, distance_km: f64, bearing_deg: f64) -> (f64, f64) {
    let origin = Point::new(longitude, latitude);
    let reached = Haversine::destination(origin, bearing_deg, distance_km * 1000.0);
    (reached.x(), reached.y())
}

/// Bring a coordinate back into range with one additive correction per axis
///
/// Longitude outside `[-180, 180]` is shifted by 360 and latitude outside
/// `[-90, 90]` by 180. Only a single correction is applied.
pub fn wrap_coordinates(longitude: f64, latitude: f64) -> (f64, f64) {
    let mut lon = longitude;
    let mut lat = latitude;

    if lon < -180.0 {
        lon += 360.0;
    }
    if lon > 180.0 {
        lon -= 360.0;
    }
    if lat < -90.0 {
        lat += 180.0;
    }
    if lat > 90.0 {
        lat -= 180.0;
    }

    (lon, lat)
}

/// Generate the path of an item alive from `start_time` to `end_time`
///
/// `speed` is in meters per second and `resolution` in seconds (must be positive).
pub fn generate_path<R>(
    rng: &mut R,
    start_time: i64,
    end_time: i64,
    speed: f64,
    resolution: i64,
) -> Path
where
    R: Rng + ?Sized,
{
    let steps = step_count(start_time, end_time, resolution);
    let step_km = speed * resolution as f64 / 1000.0;

    let mut waypoints = Vec::with_capacity(steps + 1);
    let origin = Waypoint::new(
        rng.gen_range(ORIGIN_LONGITUDE.0..ORIGIN_LONGITUDE.1),
        rng.gen_range(ORIGIN_LATITUDE.0..ORIGIN_LATITUDE.1),
        start_time,
    );
    waypoints.push(origin);

    let mut heading: f64 = rng.gen_range(-180.0..180.0);
    let mut previous = origin;

    for step in 1..=steps {
        if step % HEADING_PERTURBATION_INTERVAL == 0 {
            heading += rng.gen_range(-MAX_HEADING_DELTA..MAX_HEADING_DELTA);
        }

        let (lon, lat) = destination(previous.longitude, previous.latitude, step_km, heading);
        let (lon, lat) = wrap_coordinates(lon, lat);

        let next = Waypoint::new(lon, lat, start_time + resolution * step as i64);
        waypoints.push(next);
        previous = next;
    }

    trace!(steps, step_km, "Generated path");
    Path { waypoints }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn great_circle_km(a: &Waypoint, b: &Waypoint) -> f64 {
        let d_lat = (b.latitude - a.latitude).to_radians();
        let d_lon = (b.longitude - a.longitude).to_radians();
        let h = (d_lat / 2.0).sin().powi(2)
            + a.latitude.to_radians().cos()
                * b.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
    }

    #[test]
    fn test_step_count() {
        assert_eq!(step_count(0, 60, 10), 6);
        assert_eq!(step_count(0, 65, 10), 6);
        assert_eq!(step_count(0, 9, 10), 0);
        assert_eq!(step_count(100, 100, 10), 0);
        assert_eq!(step_count(100, 50, 10), 0);
    }

    #[test]
    fn test_destination_zero_distance() {
        let (lon, lat) = destination(12.5, -33.0, 0.0, 77.0);
        assert!((lon - 12.5).abs() < 1e-9);
        assert!((lat + 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_destination_cardinal_directions() {
        let one_degree_km = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

        let (lon, lat) = destination(0.0, 0.0, one_degree_km, 0.0);
        assert!(lon.abs() < 1e-9);
        assert!((lat - 1.0).abs() < 1e-9);

        let (lon, lat) = destination(0.0, 0.0, one_degree_km, 90.0);
        assert!((lon - 1.0).abs() < 1e-9);
        assert!(lat.abs() < 1e-9);

        let (lon, lat) = destination(10.0, 20.0, one_degree_km, 180.0);
        assert!((lon - 10.0).abs() < 1e-9);
        assert!((lat - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_destination_crosses_antimeridian_unwrapped() {
        let (lon, _) = destination(179.9, 0.0, 50.0, 90.0);
        assert!(lon > 180.0);
        let (lon, _) = wrap_coordinates(lon, 0.0);
        assert!(lon < -179.0);
    }

    #[test]
    fn test_wrap_coordinates_single_correction() {
        assert_eq!(wrap_coordinates(181.0, 0.0), (-179.0, 0.0));
        assert_eq!(wrap_coordinates(-181.0, 0.0), (179.0, 0.0));
        assert_eq!(wrap_coordinates(0.0, 91.0), (0.0, -89.0));
        assert_eq!(wrap_coordinates(0.0, -91.0), (0.0, 89.0));
        assert_eq!(wrap_coordinates(180.0, 90.0), (180.0, 90.0));
        assert_eq!(wrap_coordinates(-180.0, -90.0), (-180.0, -90.0));
        // Only one correction is applied
        assert_eq!(wrap_coordinates(541.0, 0.0), (181.0, 0.0));
    }

    #[test]
    fn test_generate_path_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let path = generate_path(&mut rng, 0, 60, 500.0, 10);

        assert_eq!(path.len(), 7);
        assert_eq!(path.step_count(), 6);
        assert_eq!(path.span_seconds(), 60);

        let origin = path.origin().unwrap();
        assert_eq!(origin.timestamp, 0);
        assert!(origin.longitude >= -90.0 && origin.longitude < 90.0);
        assert!(origin.latitude >= -45.0 && origin.latitude < 45.0);
    }

    #[test]
    fn test_generate_path_timestamps_strictly_increase() {
        let mut rng = StdRng::seed_from_u64(2);
        let start = 1_700_000_000;
        let end = start + 7_199;
        let path = generate_path(&mut rng, start, end, 650.0, 10);

        assert_eq!(path.step_count(), 719);
        for pair in path.waypoints().windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 10);
        }
        assert_eq!(path.span_seconds(), 10 * 719);
    }

    #[test]
    fn test_generate_path_step_distance() {
        let mut rng = StdRng::seed_from_u64(3);
        let path = generate_path(&mut rng, 0, 600, 400.0, 10);

        for pair in path.waypoints().windows(2) {
            let km = great_circle_km(&pair[0], &pair[1]);
            assert!((km - 4.0).abs() < 1e-6, "step was {} km", km);
        }
    }

    #[test]
    fn test_generate_path_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            // Fast items over long lifetimes travel around the globe several times
            let path = generate_path(&mut rng, 0, 7_200, 5_000.0, 10);
            for point in path.waypoints() {
                assert!((-180.0..=180.0).contains(&point.longitude), "lon {}", point.longitude);
                assert!((-90.0..=90.0).contains(&point.latitude), "lat {}", point.latitude);
                assert_eq!(point.altitude, 0.0);
            }
        }
    }

    #[test]
    fn test_generate_path_zero_speed_stays_put() {
        let mut rng = StdRng::seed_from_u64(5);
        let path = generate_path(&mut rng, 0, 100, 0.0, 10);
        let origin = *path.origin().unwrap();
        for point in path.waypoints() {
            assert!((point.longitude - origin.longitude).abs() < 1e-9);
            assert!((point.latitude - origin.latitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_generate_path_too_short_for_a_step() {
        let mut rng = StdRng::seed_from_u64(6);
        let path = generate_path(&mut rng, 10, 15, 500.0, 10);
        assert_eq!(path.len(), 1);
        assert_eq!(path.span_seconds(), 0);
    }

    #[test]
    fn test_path_serialization() {
        let path = Path {
            waypoints: vec![Waypoint::new(1.5, -2.0, 100), Waypoint::new(1.6, -2.1, 110)],
        };
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "linestring",
                "coordinates": [[1.5, -2.0, 0.0, 100], [1.6, -2.1, 0.0, 110]]
            })
        );
    }
}
