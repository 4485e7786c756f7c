use serde::{Deserialize, Serialize};

/// Mean kilometers per degree of latitude on the WGS84 ellipsoid.
pub const KM_PER_DEG_LAT: f64 = 111.0;

/// Geographic coordinate in degrees.
///
/// Valid coordinates satisfy `-90 <= lat <= 90` and `-180 <= lon <= 180`.
/// Construction does not enforce the invariant; callers that accept
/// external input check [`Coordinate::is_valid`] and reject the rest.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Latitude/longitude bounding box in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Bounding box around `center` with a half-extent of `radius_km`.
    ///
    /// One degree of latitude is ~111 km; a degree of longitude shrinks by
    /// `cos(lat)` towards the poles.
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let lat_offset = radius_km / KM_PER_DEG_LAT;
        let lon_offset = radius_km / (KM_PER_DEG_LAT * center.lat.to_radians().cos());
        Self {
            min_lat: center.lat - lat_offset,
            max_lat: center.lat + lat_offset,
            min_lon: center.lon - lon_offset,
            max_lon: center.lon + lon_offset,
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, GeoBounds};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn validates_coordinate_ranges() {
        assert!(Coordinate::new(40.0, -3.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.1, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn bounds_around_equator_are_symmetric() {
        let b = GeoBounds::around(Coordinate::new(0.0, 0.0), 111.0);
        assert_close(b.max_lat - b.min_lat, 2.0, 1e-9);
        assert_close(b.max_lon - b.min_lon, 2.0, 1e-9);
    }

    #[test]
    fn lon_extent_widens_away_from_equator() {
        let equator = GeoBounds::around(Coordinate::new(0.0, 0.0), 10.0);
        let north = GeoBounds::around(Coordinate::new(60.0, 0.0), 10.0);
        let eq_span = equator.max_lon - equator.min_lon;
        let north_span = north.max_lon - north.min_lon;
        assert!(north_span > eq_span);
    }

    #[test]
    fn contains_checks_both_axes() {
        let b = GeoBounds::around(Coordinate::new(40.0, -3.0), 50.0);
        assert!(b.contains(Coordinate::new(40.0, -3.0)));
        assert!(!b.contains(Coordinate::new(42.0, -3.0)));
        assert!(!b.contains(Coordinate::new(40.0, 0.0)));
    }
}
