//! Spherical rotation applied before projecting.
//!
//! Follows the usual three-axis convention: `lambda` spins the globe around
//! its polar axis, `phi` tilts it toward or away from the viewer, and `gamma`
//! rolls it around the view axis. A rotation of `(-lon, -lat, 0)` brings
//! `(lon, lat)` to the center of the view.

use super::coord::{wrap_radians, GeoCoordinate};
use glam::DVec3;

/// Rotation angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
    pub gamma: f64,
}

impl Rotation {
    pub const fn new(lambda: f64, phi: f64, gamma: f64) -> Self {
        Self { lambda, phi, gamma }
    }

    /// The rotation that puts `center` in the middle of the view.
    pub fn centered_on(center: GeoCoordinate) -> Self {
        Self::new(-center.lon(), -center.lat(), 0.0)
    }

    /// Rotates a point given in radians, returning rotated radians.
    pub fn apply(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_radians(lambda + self.lambda.to_radians());
        if self.phi == 0.0 && self.gamma == 0.0 {
            return (lambda, phi);
        }

        let (sin_dphi, cos_dphi) = self.phi.to_radians().sin_cos();
        let (sin_dgamma, cos_dgamma) = self.gamma.to_radians().sin_cos();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * cos_dphi + x * sin_dphi;

        (
            (y * cos_dgamma - k * sin_dgamma).atan2(x * cos_dphi - z * sin_dphi),
            (k * cos_dgamma + y * sin_dgamma).clamp(-1.0, 1.0).asin(),
        )
    }

    /// Undoes [`Rotation::apply`].
    pub fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (lambda, phi) = if self.phi == 0.0 && self.gamma == 0.0 {
            (lambda, phi)
        } else {
            let (sin_dphi, cos_dphi) = self.phi.to_radians().sin_cos();
            let (sin_dgamma, cos_dgamma) = self.gamma.to_radians().sin_cos();

            let cos_phi = phi.cos();
            let x = lambda.cos() * cos_phi;
            let y = lambda.sin() * cos_phi;
            let z = phi.sin();
            let k = z * cos_dgamma - y * sin_dgamma;

            (
                (y * cos_dgamma + z * sin_dgamma).atan2(x * cos_dphi + k * sin_dphi),
                (k * cos_dphi - x * sin_dphi).clamp(-1.0, 1.0).asin(),
            )
        };

        (wrap_radians(lambda - self.lambda.to_radians()), phi)
    }

    /// Rotates a coordinate and returns the unit vector in view space.
    ///
    /// In view space the viewer looks down the negative x axis: the view
    /// center is `(1, 0, 0)`, y points right and z points up.
    pub fn to_view_vector(&self, coord: GeoCoordinate) -> DVec3 {
        let (lambda, phi) = coord.to_radians();
        let (lambda, phi) = self.apply(lambda, phi);
        cartesian(lambda, phi)
    }

    /// The geographic coordinate currently in the middle of the view.
    pub fn view_center(&self) -> GeoCoordinate {
        let (lambda, phi) = self.invert(0.0, 0.0);
        GeoCoordinate::new(lambda.to_degrees(), phi.to_degrees())
    }
}

/// Unit vector for spherical coordinates in radians.
pub(crate) fn cartesian(lambda: f64, phi: f64) -> DVec3 {
    let cos_phi = phi.cos();
    DVec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn test_centered_rotation_moves_center_to_origin() {
        let center = GeoCoordinate::new(2.35, 48.85);
        let rotation = Rotation::centered_on(center);
        let (lambda, phi) = center.to_radians();
        let (lambda, phi) = rotation.apply(lambda, phi);
        assert_close(lambda, 0.0, 1e-12);
        assert_close(phi, 0.0, 1e-12);
    }

    #[test]
    fn test_invert_round_trips() {
        let rotation = Rotation::new(-30.0, 45.0, 10.0);
        let (lambda, phi) = (0.7, -0.3);
        let (rl, rp) = rotation.apply(lambda, phi);
        let (il, ip) = rotation.invert(rl, rp);
        assert_close(il, lambda, 1e-12);
        assert_close(ip, phi, 1e-12);
    }

    #[test]
    fn test_view_center_matches_centered_rotation() {
        let center = GeoCoordinate::new(-122.4, 37.8);
        let view = Rotation::centered_on(center).view_center();
        assert_close(view.lon(), center.lon(), 1e-9);
        assert_close(view.lat(), center.lat(), 1e-9);
    }

    #[test]
    fn test_view_vector_of_center_faces_viewer() {
        let center = GeoCoordinate::new(100.0, -20.0);
        let v = Rotation::centered_on(center).to_view_vector(center);
        assert_close(v.x, 1.0, 1e-12);
        assert_close(v.y, 0.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);
    }
}
