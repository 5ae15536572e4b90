//! Longitude/latitude grid lines.

use geo_types::{Coord, LineString, MultiLineString};

/// Spacing between generated points along each grid line, in degrees.
const PRECISION: f64 = 2.5;

/// Minor lines stop short of the poles so they don't converge into a blot.
const MINOR_EXTENT: f64 = 80.0;

/// Meridians on multiples of this value run all the way to the poles.
const MAJOR_STEP: f64 = 90.0;

const EPSILON: f64 = 1e-6;

/// Builds a graticule with lines every `step` degrees.
///
/// Meridians on multiples of 90° span (almost) pole to pole and are always
/// present, whatever the step. The other meridians sit on multiples of
/// `step` and span ±80° latitude. Parallels span the full longitude range
/// and are placed on multiples of `step` within ±80°.
pub fn graticule(step: f64) -> MultiLineString<f64> {
    let mut lines = Vec::new();

    let major_extent = 90.0 - EPSILON;
    let mut lon = -180.0;
    while lon < 180.0 - EPSILON {
        lines.push(meridian(lon, -major_extent, major_extent));
        lon += MAJOR_STEP;
    }

    let mut lon = (-180.0 / step).ceil() * step;
    while lon < 180.0 - EPSILON {
        if !is_major(lon) {
            lines.push(meridian(lon, -MINOR_EXTENT, MINOR_EXTENT));
        }
        lon += step;
    }

    let mut lat = (-MINOR_EXTENT / step).ceil() * step;
    while lat <= MINOR_EXTENT + EPSILON {
        lines.push(parallel(lat));
        lat += step;
    }

    MultiLineString::new(lines)
}

fn is_major(lon: f64) -> bool {
    let rem = lon.rem_euclid(MAJOR_STEP);
    rem < EPSILON || MAJOR_STEP - rem < EPSILON
}

fn meridian(lon: f64, lat0: f64, lat1: f64) -> LineString<f64> {
    LineString::new(samples(lat0, lat1).map(|lat| Coord { x: lon, y: lat }).collect())
}

fn parallel(lat: f64) -> LineString<f64> {
    LineString::new(samples(-180.0, 180.0).map(|lon| Coord { x: lon, y: lat }).collect())
}

/// Evenly spaced values from `start` to `end`, both included.
fn samples(start: f64, end: f64) -> impl Iterator<Item = f64> {
    let count = ((end - start) / PRECISION).ceil().max(1.0) as usize;
    (0..=count).map(move |i| start + (end - start) * (i as f64) / (count as f64))
}
