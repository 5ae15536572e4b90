//! Projected path geometry.
//!
//! Turns geographic shapes into pixel-space subpaths through a
//! [`Projection`], ready for any draw backend.

use super::projection::Projection;
use geo_types::{MultiLineString, MultiPolygon};
use glam::DVec2;
use std::fmt::Write;

/// One continuous run of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub points: Vec<DVec2>,
    /// Closed subpaths are polygon rings; open ones are lines.
    pub closed: bool,
}

/// A projected path made of one or more subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub subpaths: Vec<SubPath>,
}

impl PathData {
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Total number of projected vertices.
    pub fn vertex_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.points.len()).sum()
    }

    /// Serializes to SVG path data (`M x,y L x,y ... Z`).
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for subpath in &self.subpaths {
            for (i, p) in subpath.points.iter().enumerate() {
                let command = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{}{},{}", command, fmt_coord(p.x), fmt_coord(p.y));
            }
            if subpath.closed {
                d.push('Z');
            }
        }
        d
    }
}

/// Formats a pixel coordinate with at most two decimals, trimming zeros.
pub(crate) fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0" in output.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut s = format!("{:.2}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Projects every ring of every polygon.
pub fn polygons_path(projection: &dyn Projection, shape: &MultiPolygon<f64>) -> PathData {
    let mut subpaths = Vec::new();
    for polygon in &shape.0 {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            for points in projection.project_ring(&ring.0) {
                if points.len() >= 3 {
                    subpaths.push(SubPath {
                        points,
                        closed: true,
                    });
                }
            }
        }
    }
    PathData { subpaths }
}

/// Projects a set of lines.
pub fn lines_path(projection: &dyn Projection, lines: &MultiLineString<f64>) -> PathData {
    let subpaths = lines
        .0
        .iter()
        .flat_map(|line| projection.project_line(&line.0))
        .filter(|points| points.len() >= 2)
        .map(|points| SubPath {
            points,
            closed: false,
        })
        .collect();
    PathData { subpaths }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::projection::Equirectangular;
    use geo_types::{coord, LineString, Polygon};

    #[test]
    fn test_coordinate_formatting() {
        assert_eq!(fmt_coord(200.0), "200");
        assert_eq!(fmt_coord(12.3456), "12.35");
        assert_eq!(fmt_coord(0.5), "0.5");
        assert_eq!(fmt_coord(-0.001), "0");
    }

    #[test]
    fn test_polygon_path_is_closed() {
        let projection = Equirectangular::for_width(360.0);
        let square = Polygon::new(
            LineString::new(vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 10.0, y: 0.0 },
                coord! { x: 10.0, y: 10.0 },
                coord! { x: 0.0, y: 0.0 },
            ]),
            vec![],
        );
        let path = polygons_path(&projection, &MultiPolygon::new(vec![square]));
        assert_eq!(path.subpaths.len(), 1);
        assert!(path.subpaths[0].closed);
        let d = path.to_svg();
        assert!(d.starts_with("M180,90L"));
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn test_lines_path_splits_at_antimeridian() {
        let projection = Equirectangular::for_width(360.0);
        let lines = MultiLineString::new(vec![LineString::new(vec![
            coord! { x: 170.0, y: 0.0 },
            coord! { x: -170.0, y: 0.0 },
        ])]);
        let path = lines_path(&projection, &lines);
        assert_eq!(path.subpaths.len(), 2);
        assert_eq!(path.vertex_count(), 4);
        assert!(path.subpaths.iter().all(|s| !s.closed));
    }
}
