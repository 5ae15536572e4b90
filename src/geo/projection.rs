//! Map projections and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lon/lat) and pixel
//! coordinates on a render surface. Two projections are provided: an
//! orthographic globe clipped to its visible hemisphere, and a plain
//! equirectangular world map.

use super::clip::{
    clip_line_to_hemisphere, clip_ring_to_hemisphere, split_at_antimeridian, wrap_ring_copies,
    HEMISPHERE_EPSILON,
};
use super::coord::{wrap_radians, GeoCoordinate};
use super::rotation::{cartesian, Rotation};
use geo_types::Coord;
use glam::{DVec2, DVec3};
use std::f64::consts::{FRAC_PI_2, PI};

/// Angular tolerance for the hemisphere visibility test, in radians.
///
/// A point exactly 90° from the view center counts as visible.
pub const VISIBILITY_TOLERANCE: f64 = 1e-9;

/// Maps geographic coordinates to pixels and back.
pub trait Projection {
    /// Projects a single coordinate, or `None` if it cannot be shown.
    fn project(&self, coord: GeoCoordinate) -> Option<DVec2>;

    /// Maps a pixel position back to a coordinate, or `None` if the pixel
    /// lies outside the projected world.
    fn invert(&self, point: DVec2) -> Option<GeoCoordinate>;

    /// Projects a polygon ring given in degrees.
    ///
    /// The result may hold zero rings (fully hidden) or several (a ring cut
    /// by the edge of the map).
    fn project_ring(&self, ring: &[Coord<f64>]) -> Vec<Vec<DVec2>>;

    /// Projects a line string given in degrees, split into drawable runs.
    fn project_line(&self, line: &[Coord<f64>]) -> Vec<Vec<DVec2>>;
}

/// Orthographic projection of the globe, clipped at 90° from the view
/// center.
#[derive(Debug, Clone)]
pub struct Orthographic {
    scale: f64,
    translate: DVec2,
    rotation: Rotation,
}

impl Orthographic {
    /// Creates a projection with the given radius in pixels and center.
    pub fn new(scale: f64, translate: DVec2) -> Self {
        Self {
            scale,
            translate,
            rotation: Rotation::default(),
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> DVec2 {
        self.translate
    }

    /// The coordinate currently facing the viewer.
    pub fn view_center(&self) -> GeoCoordinate {
        self.rotation.view_center()
    }

    /// Returns true if `coord` lies on the visible hemisphere.
    pub fn is_visible(&self, coord: GeoCoordinate) -> bool {
        coord.is_finite()
            && coord.distance_to(&self.view_center()) <= FRAC_PI_2 + VISIBILITY_TOLERANCE
    }

    fn to_screen(&self, v: DVec3) -> DVec2 {
        DVec2::new(
            self.translate.x + self.scale * v.y,
            self.translate.y - self.scale * v.z,
        )
    }

    fn view_vectors(&self, coords: &[Coord<f64>]) -> Vec<DVec3> {
        coords
            .iter()
            .map(|c| {
                let (lambda, phi) = self.rotation.apply(c.x.to_radians(), c.y.to_radians());
                cartesian(lambda, phi)
            })
            .collect()
    }
}

impl Projection for Orthographic {
    fn project(&self, coord: GeoCoordinate) -> Option<DVec2> {
        if !coord.is_finite() {
            return None;
        }
        let v = self.rotation.to_view_vector(coord);
        if v.x < -HEMISPHERE_EPSILON {
            return None;
        }
        Some(self.to_screen(v))
    }

    fn invert(&self, point: DVec2) -> Option<GeoCoordinate> {
        let x = (point.x - self.translate.x) / self.scale;
        let y = (self.translate.y - point.y) / self.scale;
        let rho_sq = x * x + y * y;
        if !rho_sq.is_finite() || rho_sq > 1.0 {
            return None;
        }

        let cos_c = (1.0 - rho_sq).sqrt();
        let lambda = x.atan2(cos_c);
        let phi = y.clamp(-1.0, 1.0).asin();
        let (lambda, phi) = self.rotation.invert(lambda, phi);
        Some(GeoCoordinate::new(lambda.to_degrees(), phi.to_degrees()))
    }

    fn project_ring(&self, ring: &[Coord<f64>]) -> Vec<Vec<DVec2>> {
        let vectors = self.view_vectors(ring);
        clip_ring_to_hemisphere(&vectors)
            .map(|clipped| vec![clipped.into_iter().map(|v| self.to_screen(v)).collect()])
            .unwrap_or_default()
    }

    fn project_line(&self, line: &[Coord<f64>]) -> Vec<Vec<DVec2>> {
        let vectors = self.view_vectors(line);
        clip_line_to_hemisphere(&vectors)
            .into_iter()
            .map(|run| run.into_iter().map(|v| self.to_screen(v)).collect())
            .collect()
    }
}

/// Equirectangular (plate carrée) projection.
#[derive(Debug, Clone)]
pub struct Equirectangular {
    scale: f64,
    translate: DVec2,
}

impl Equirectangular {
    pub fn new(scale: f64, translate: DVec2) -> Self {
        Self { scale, translate }
    }

    /// A projection where 360° of longitude spans exactly `width` pixels,
    /// centered on (0, 0) in a `width` x `width / 2` canvas.
    pub fn for_width(width: f64) -> Self {
        Self::new(width / (2.0 * PI), DVec2::new(width / 2.0, width / 4.0))
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> DVec2 {
        self.translate
    }

    fn raw(&self, lon: f64, lat: f64) -> DVec2 {
        DVec2::new(
            self.translate.x + self.scale * lon.to_radians(),
            self.translate.y - self.scale * lat.to_radians(),
        )
    }
}

impl Projection for Equirectangular {
    fn project(&self, coord: GeoCoordinate) -> Option<DVec2> {
        if !coord.is_finite() {
            return None;
        }
        Some(self.raw(coord.lon(), coord.lat()))
    }

    fn invert(&self, point: DVec2) -> Option<GeoCoordinate> {
        let lambda = (point.x - self.translate.x) / self.scale;
        let phi = (self.translate.y - point.y) / self.scale;
        if !lambda.is_finite() || !phi.is_finite() || phi.abs() > FRAC_PI_2 {
            return None;
        }
        Some(GeoCoordinate::new(
            wrap_radians(lambda).to_degrees(),
            phi.to_degrees(),
        ))
    }

    fn project_ring(&self, ring: &[Coord<f64>]) -> Vec<Vec<DVec2>> {
        wrap_ring_copies(ring)
            .into_iter()
            .map(|copy| copy.iter().map(|c| self.raw(c.x, c.y)).collect())
            .collect()
    }

    fn project_line(&self, line: &[Coord<f64>]) -> Vec<Vec<DVec2>> {
        split_at_antimeridian(line)
            .into_iter()
            .map(|run| run.iter().map(|c| self.raw(c.x, c.y)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn globe(center: GeoCoordinate) -> Orthographic {
        Orthographic::new(99.5, DVec2::new(100.0, 100.0))
            .with_rotation(Rotation::centered_on(center))
    }

    #[test]
    fn test_orthographic_center_projects_to_translate() {
        let center = GeoCoordinate::new(2.35, 48.85);
        let p = globe(center).project(center).unwrap();
        assert_close(p.x, 100.0, 1e-9);
        assert_close(p.y, 100.0, 1e-9);
    }

    #[test]
    fn test_orthographic_north_is_up() {
        let proj = globe(GeoCoordinate::new(0.0, 0.0));
        let p = proj.project(GeoCoordinate::new(0.0, 30.0)).unwrap();
        assert_close(p.x, 100.0, 1e-9);
        assert_close(p.y, 100.0 - 99.5 * 0.5, 1e-9);
        let east = proj.project(GeoCoordinate::new(30.0, 0.0)).unwrap();
        assert!(east.x > 100.0);
    }

    #[test]
    fn test_orthographic_far_side_is_invisible() {
        let proj = globe(GeoCoordinate::new(0.0, 0.0));
        assert!(proj.project(GeoCoordinate::new(135.0, 0.0)).is_none());
        assert!(!proj.is_visible(GeoCoordinate::new(135.0, 0.0)));
        assert!(proj.is_visible(GeoCoordinate::new(45.0, 0.0)));
    }

    #[test]
    fn test_orthographic_horizon_is_inclusive() {
        let proj = globe(GeoCoordinate::new(0.0, 0.0));
        let edge = GeoCoordinate::new(90.0, 0.0);
        assert!(proj.is_visible(edge));
        let p = proj.project(edge).unwrap();
        assert_close(p.x, 199.5, 1e-9);
    }

    #[test]
    fn test_orthographic_invert_round_trips() {
        let proj = globe(GeoCoordinate::new(-60.0, 25.0));
        let coord = GeoCoordinate::new(-50.0, 30.0);
        let p = proj.project(coord).unwrap();
        let back = proj.invert(p).unwrap();
        assert_close(back.lon(), coord.lon(), 1e-9);
        assert_close(back.lat(), coord.lat(), 1e-9);
        assert!(proj.invert(DVec2::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_equirectangular_center_and_scale() {
        let proj = Equirectangular::for_width(400.0);
        let p = proj.project(GeoCoordinate::new(0.0, 0.0)).unwrap();
        assert_close(p.x, 200.0, 1e-9);
        assert_close(p.y, 100.0, 1e-9);

        assert_close(proj.scale() * 2.0 * PI, 400.0, 1e-9);
        let west = proj.project(GeoCoordinate::new(-90.0, 0.0)).unwrap();
        let east = proj.project(GeoCoordinate::new(90.0, 0.0)).unwrap();
        assert_close(east.x - west.x, 200.0, 1e-9);

        let corner = proj.project(GeoCoordinate::new(180.0, 90.0)).unwrap();
        assert_close(corner.x, 400.0, 1e-9);
        assert_close(corner.y, 0.0, 1e-9);
    }

    #[test]
    fn test_equirectangular_rejects_non_finite() {
        let proj = Equirectangular::for_width(400.0);
        assert!(proj.project(GeoCoordinate::new(f64::NAN, 0.0)).is_none());
    }

    #[test]
    fn test_equirectangular_invert() {
        let proj = Equirectangular::for_width(360.0);
        let coord = proj.invert(DVec2::new(270.0, 45.0)).unwrap();
        assert_close(coord.lon(), 90.0, 1e-9);
        assert_close(coord.lat(), 45.0, 1e-9);
    }
}
