//! World boundary data decoded from TopoJSON.
//!
//! A topology stores every border segment ("arc") once and describes
//! countries as rings of arc references. That shared structure is what lets
//! us tell interior borders (arcs used by two countries) from coastlines
//! (arcs used by one).

use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Name of the country collection in world-atlas topologies.
pub const COUNTRIES_OBJECT: &str = "countries";

/// Errors that can occur while decoding a topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to parse topology: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("topology object {0:?} is not a geometry collection")]
    NotACollection(String),
    #[error("arc index {0} is out of range")]
    ArcOutOfRange(i64),
}

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: HashMap<String, TopoGeometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    #[serde(other)]
    Unsupported,
}

/// A single country outline.
#[derive(Debug, Clone)]
pub struct Country {
    /// Identifier from the topology (ISO numeric code in world-atlas).
    pub id: Option<String>,
    /// Display name, when the topology carries one.
    pub name: Option<String>,
    pub shape: MultiPolygon<f64>,
}

/// Country polygons plus the derived border and coastline meshes.
///
/// Loaded once and shared read-only between renderers.
#[derive(Debug, Clone)]
pub struct WorldBoundaries {
    pub countries: Vec<Country>,
    /// Arcs shared by two different countries.
    pub borders: MultiLineString<f64>,
    /// Arcs that belong to a single country.
    pub coastlines: MultiLineString<f64>,
}

impl Default for WorldBoundaries {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            borders: MultiLineString::new(Vec::new()),
            coastlines: MultiLineString::new(Vec::new()),
        }
    }
}

impl WorldBoundaries {
    /// Decodes boundaries from a TopoJSON document.
    ///
    /// `object` names the geometry collection holding the countries,
    /// normally [`COUNTRIES_OBJECT`].
    pub fn from_topojson(json: &str, object: &str) -> Result<Self, TopologyError> {
        let topology: Topology = serde_json::from_str(json)?;
        let arcs = decode_arcs(&topology.arcs, topology.transform);

        let geometries = match topology.objects.get(object) {
            Some(TopoGeometry::GeometryCollection { geometries }) => geometries,
            Some(_) => return Err(TopologyError::NotACollection(object.to_string())),
            None => return Err(TopologyError::MissingObject(object.to_string())),
        };

        let countries = geometries
            .iter()
            .filter_map(|g| country(g, &arcs).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        let borders = mesh(geometries, &arcs, |a, b| a != b)?;
        let coastlines = mesh(geometries, &arcs, |a, b| a == b)?;

        log::info!(
            "Decoded {} countries, {} border arcs, {} coastline arcs",
            countries.len(),
            borders.0.len(),
            coastlines.0.len()
        );

        Ok(Self {
            countries,
            borders,
            coastlines,
        })
    }

    /// Total number of vertices across all country outlines.
    pub fn vertex_count(&self) -> usize {
        self.countries
            .iter()
            .flat_map(|c| c.shape.0.iter())
            .map(|p| p.exterior().0.len() + p.interiors().iter().map(|r| r.0.len()).sum::<usize>())
            .sum()
    }
}

/// Resolves quantized, delta-encoded arcs into absolute coordinates.
fn decode_arcs(arcs: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Vec<Vec<Coord<f64>>> {
    arcs.iter()
        .map(|arc| match transform {
            Some(t) => {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| {
                        x += p[0];
                        y += p[1];
                        Coord {
                            x: x * t.scale[0] + t.translate[0],
                            y: y * t.scale[1] + t.translate[1],
                        }
                    })
                    .collect()
            }
            None => arc
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| Coord { x: p[0], y: p[1] })
                .collect(),
        })
        .collect()
}

/// Index into the arc table for a possibly-reversed reference.
fn arc_slot(index: i64) -> usize {
    if index < 0 {
        (!index) as usize
    } else {
        index as usize
    }
}

fn arc_points(index: i64, arcs: &[Vec<Coord<f64>>]) -> Result<Vec<Coord<f64>>, TopologyError> {
    let arc = arcs
        .get(arc_slot(index))
        .ok_or(TopologyError::ArcOutOfRange(index))?;
    let mut points = arc.clone();
    if index < 0 {
        points.reverse();
    }
    Ok(points)
}

/// Joins a sequence of arcs into one ring.
///
/// Consecutive arcs share their end points, so the first point of each
/// following arc is dropped.
fn ring(indices: &[i64], arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>, TopologyError> {
    let mut points: Vec<Coord<f64>> = Vec::new();
    for &index in indices {
        let arc = arc_points(index, arcs)?;
        if points.is_empty() {
            points.extend(arc);
        } else {
            points.extend(arc.into_iter().skip(1));
        }
    }

    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            points.push(first);
        }
    }
    Ok(LineString::new(points))
}

fn polygon(
    rings: &[Vec<i64>],
    arcs: &[Vec<Coord<f64>>],
) -> Result<Option<Polygon<f64>>, TopologyError> {
    let mut rings = rings.iter().map(|r| ring(r, arcs));
    let Some(exterior) = rings.next().transpose()? else {
        return Ok(None);
    };
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Polygon::new(exterior, interiors)))
}

fn country(
    geometry: &TopoGeometry,
    arcs: &[Vec<Coord<f64>>],
) -> Result<Option<Country>, TopologyError> {
    let (polygons, id, properties): (Vec<Polygon<f64>>, _, _) = match geometry {
        TopoGeometry::Polygon { arcs: rings, id, properties } => {
            (polygon(rings, arcs)?.into_iter().collect(), id, properties)
        }
        TopoGeometry::MultiPolygon { arcs: polys, id, properties } => {
            let mut out = Vec::with_capacity(polys.len());
            for rings in polys {
                if let Some(p) = polygon(rings, arcs)? {
                    out.push(p);
                }
            }
            (out, id, properties)
        }
        _ => return Ok(None),
    };

    let id = id.as_ref().map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    let name = properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(Some(Country {
        id,
        name,
        shape: MultiPolygon::new(polygons),
    }))
}

/// Arc references of a polygonal geometry.
fn geometry_arcs(geometry: &TopoGeometry) -> Vec<i64> {
    match geometry {
        TopoGeometry::Polygon { arcs, .. } => arcs.iter().flatten().copied().collect(),
        TopoGeometry::MultiPolygon { arcs, .. } => {
            arcs.iter().flatten().flatten().copied().collect()
        }
        _ => Vec::new(),
    }
}

/// Collects the arcs accepted by `filter` into line strings.
///
/// `filter` receives the indices of the first and last geometry using the
/// arc. Arcs used by a single geometry see the same index twice.
fn mesh(
    geometries: &[TopoGeometry],
    arcs: &[Vec<Coord<f64>>],
    filter: impl Fn(usize, usize) -> bool,
) -> Result<MultiLineString<f64>, TopologyError> {
    let mut owners: Vec<Vec<usize>> = vec![Vec::new(); arcs.len()];
    for (geometry_index, geometry) in geometries.iter().enumerate() {
        for index in geometry_arcs(geometry) {
            let slot = owners
                .get_mut(arc_slot(index))
                .ok_or(TopologyError::ArcOutOfRange(index))?;
            slot.push(geometry_index);
        }
    }

    let lines = owners
        .iter()
        .enumerate()
        .filter_map(|(slot, users)| match (users.first(), users.last()) {
            (Some(&a), Some(&b)) if filter(a, b) => Some(LineString::new(arcs[slot].clone())),
            _ => None,
        })
        .collect();

    Ok(MultiLineString::new(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two unit squares side by side sharing the edge at x = 1.
    ///
    /// Arc 0 is the shared edge (1,0)->(1,1). Arc 1 is the rest of the left
    /// square, arc 2 the rest of the right square.
    const TWO_SQUARES: &str = r#"{
        "type": "Topology",
        "arcs": [
            [[1, 0], [1, 1]],
            [[1, 1], [0, 1], [0, 0], [1, 0]],
            [[1, 0], [2, 0], [2, 1], [1, 1]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "004", "properties": {"name": "Left"}, "arcs": [[0, 1]]},
                    {"type": "Polygon", "id": 8, "arcs": [[2, -1]]}
                ]
            }
        }
    }"#;

    #[test]
    fn test_decode_countries() {
        let world = WorldBoundaries::from_topojson(TWO_SQUARES, COUNTRIES_OBJECT).unwrap();
        assert_eq!(world.countries.len(), 2);

        let left = &world.countries[0];
        assert_eq!(left.id.as_deref(), Some("004"));
        assert_eq!(left.name.as_deref(), Some("Left"));
        let exterior = left.shape.0[0].exterior();
        assert_eq!(exterior.0.len(), 5);
        assert_eq!(exterior.0.first(), exterior.0.last());

        let right = &world.countries[1];
        assert_eq!(right.id.as_deref(), Some("8"));
        assert_eq!(right.name, None);
        // Reversed arc -1 runs from (1,1) back down to (1,0).
        let coords = &right.shape.0[0].exterior().0;
        assert_eq!(coords[3], Coord { x: 1.0, y: 1.0 });
        assert_eq!(coords[4], Coord { x: 1.0, y: 0.0 });
    }

    #[test]
    fn test_mesh_separates_borders_from_coasts() {
        let world = WorldBoundaries::from_topojson(TWO_SQUARES, COUNTRIES_OBJECT).unwrap();
        assert_eq!(world.borders.0.len(), 1);
        assert_eq!(
            world.borders.0[0].0,
            vec![Coord { x: 1.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }]
        );
        assert_eq!(world.coastlines.0.len(), 2);
    }

    #[test]
    fn test_quantized_arcs_are_delta_decoded() {
        let json = r#"{
            "type": "Topology",
            "transform": {"scale": [0.5, 0.25], "translate": [-10, 20]},
            "arcs": [[[0, 0], [4, 0], [0, 4], [-4, -4]]],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [{"type": "Polygon", "arcs": [[0]]}]
                }
            }
        }"#;
        let world = WorldBoundaries::from_topojson(json, COUNTRIES_OBJECT).unwrap();
        let coords = &world.countries[0].shape.0[0].exterior().0;
        assert_eq!(coords[0], Coord { x: -10.0, y: 20.0 });
        assert_eq!(coords[1], Coord { x: -8.0, y: 20.0 });
        assert_eq!(coords[2], Coord { x: -8.0, y: 21.0 });
        assert_eq!(coords[3], Coord { x: -10.0, y: 20.0 });
        assert_eq!(world.vertex_count(), 4);
    }

    #[test]
    fn test_unsupported_geometries_are_skipped() {
        let json = r#"{
            "type": "Topology",
            "arcs": [],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [{"type": "Point", "coordinates": [0, 0]}]
                }
            }
        }"#;
        let world = WorldBoundaries::from_topojson(json, COUNTRIES_OBJECT).unwrap();
        assert!(world.countries.is_empty());
    }

    #[test]
    fn test_missing_object_is_an_error() {
        let err = WorldBoundaries::from_topojson(TWO_SQUARES, "land").unwrap_err();
        assert!(matches!(err, TopologyError::MissingObject(name) if name == "land"));
    }

    #[test]
    fn test_bad_arc_index_is_an_error() {
        let json = r#"{
            "type": "Topology",
            "arcs": [],
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [{"type": "Polygon", "arcs": [[3]]}]
                }
            }
        }"#;
        let err = WorldBoundaries::from_topojson(json, COUNTRIES_OBJECT).unwrap_err();
        assert!(matches!(err, TopologyError::ArcOutOfRange(3)));
    }
}
