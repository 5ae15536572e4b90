//! Geographic math for the globe and range map.
//!
//! This module provides coordinates, projections, hemisphere and
//! antimeridian clipping, graticules, and TopoJSON boundary decoding. None
//! of it touches a render backend.

mod clip;
mod coord;
mod graticule;
mod path;
mod projection;
mod rotation;
mod topology;

pub use coord::{great_circle_distance, normalize_longitude, GeoCoordinate};
pub use graticule::graticule;
pub(crate) use path::fmt_coord;
pub use path::{lines_path, polygons_path, PathData, SubPath};
pub use projection::{Equirectangular, Orthographic, Projection, VISIBILITY_TOLERANCE};
pub use rotation::Rotation;
pub use topology::{Country, TopologyError, WorldBoundaries, COUNTRIES_OBJECT};
