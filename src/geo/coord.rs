//! Geographic coordinates and great-circle math.

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A (longitude, latitude) pair in degrees.
///
/// Longitude is normalized into (-180, 180] and latitude is clamped into
/// [-90, 90] on construction. Non-finite inputs are kept as-is so that
/// projections can report them as unprojectable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    lon: f64,
    lat: f64,
}

impl GeoCoordinate {
    /// Creates a coordinate from longitude and latitude in degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: normalize_longitude(lon),
            lat: lat.clamp(-90.0, 90.0),
        }
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns true when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Longitude and latitude in radians.
    pub fn to_radians(&self) -> (f64, f64) {
        (self.lon.to_radians(), self.lat.to_radians())
    }

    /// Great-circle angular distance to `other`, in radians.
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        great_circle_distance(*self, *other)
    }
}

impl From<Coord<f64>> for GeoCoordinate {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<GeoCoordinate> for Coord<f64> {
    fn from(coord: GeoCoordinate) -> Self {
        Coord {
            x: coord.lon,
            y: coord.lat,
        }
    }
}

/// Wraps a longitude in degrees into (-180, 180].
pub fn normalize_longitude(lon: f64) -> f64 {
    if !lon.is_finite() {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Wraps a longitude in radians into [-PI, PI].
pub(crate) fn wrap_radians(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - 2.0 * PI
    } else if lambda < -PI {
        lambda + 2.0 * PI
    } else {
        lambda
    }
}

/// Great-circle angular distance between two coordinates, in radians.
///
/// Uses the atan2 form, which stays accurate for both tiny and antipodal
/// separations.
pub fn great_circle_distance(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let (lambda0, phi0) = a.to_radians();
    let (lambda1, phi1) = b.to_radians();

    let delta = lambda1 - lambda0;
    let (sin_delta, cos_delta) = delta.sin_cos();
    let (sin_phi0, cos_phi0) = phi0.sin_cos();
    let (sin_phi1, cos_phi1) = phi1.sin_cos();

    let x = cos_phi1 * sin_delta;
    let y = cos_phi0 * sin_phi1 - sin_phi0 * cos_phi1 * cos_delta;
    let z = sin_phi0 * sin_phi1 + cos_phi0 * cos_phi1 * cos_delta;

    (x * x + y * y).sqrt().atan2(z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn test_longitude_normalization() {
        assert_close(normalize_longitude(190.0), -170.0, 1e-12);
        assert_close(normalize_longitude(-180.0), 180.0, 1e-12);
        assert_close(normalize_longitude(180.0), 180.0, 1e-12);
        assert_close(normalize_longitude(540.0), 180.0, 1e-12);
        assert_close(normalize_longitude(-45.0), -45.0, 1e-12);
    }

    #[test]
    fn test_latitude_is_clamped() {
        let coord = GeoCoordinate::new(10.0, 95.0);
        assert_eq!(coord.lat(), 90.0);
        let coord = GeoCoordinate::new(10.0, -120.0);
        assert_eq!(coord.lat(), -90.0);
    }

    #[test]
    fn test_non_finite_coordinates_survive() {
        let coord = GeoCoordinate::new(f64::NAN, 10.0);
        assert!(!coord.is_finite());
    }

    #[test]
    fn test_distance_quarter_circle() {
        let origin = GeoCoordinate::new(0.0, 0.0);
        assert_close(origin.distance_to(&GeoCoordinate::new(90.0, 0.0)), FRAC_PI_2, 1e-12);
        assert_close(origin.distance_to(&GeoCoordinate::new(0.0, 90.0)), FRAC_PI_2, 1e-12);
    }

    #[test]
    fn test_distance_antipodal() {
        let a = GeoCoordinate::new(10.0, 20.0);
        let b = GeoCoordinate::new(-170.0, -20.0);
        assert_close(a.distance_to(&b), PI, 1e-9);
    }

    #[test]
    fn test_distance_across_antimeridian() {
        let a = GeoCoordinate::new(179.0, 0.0);
        let b = GeoCoordinate::new(-179.0, 0.0);
        assert_close(a.distance_to(&b), 2.0_f64.to_radians(), 1e-12);
    }
}
