//! Clipping of rings and lines for the two projection families.
//!
//! Orthographic views clip against the visible hemisphere in view space,
//! where the hemisphere boundary is the plane `x = 0`. Edges are treated as
//! great-circle arcs, so the crossing point of an edge is found on its chord
//! and pushed back onto the sphere. Equirectangular views cut lines at the
//! antimeridian instead.

use geo_types::Coord;
use glam::DVec3;
use std::f64::consts::PI;

/// Tolerance used for the hemisphere test, in view-space units.
pub(crate) const HEMISPHERE_EPSILON: f64 = 1e-9;

/// Angular spacing of points inserted along the horizon, in radians.
const HORIZON_STEP: f64 = 2.5 * PI / 180.0;

fn is_inside(v: DVec3) -> bool {
    v.x >= -HEMISPHERE_EPSILON
}

/// Point where the arc from `a` to `b` meets the horizon.
fn horizon_crossing(a: DVec3, b: DVec3) -> DVec3 {
    let denom = a.x - b.x;
    let t = if denom.abs() < f64::EPSILON {
        0.0
    } else {
        a.x / denom
    };
    let mut p = a + (b - a) * t;
    p.x = 0.0;
    p.normalize_or_zero()
}

/// Points strictly between `from` and `to` along the horizon circle.
///
/// Takes the shorter way round.
fn horizon_arc(from: DVec3, to: DVec3) -> Vec<DVec3> {
    let start = from.z.atan2(from.y);
    let end = to.z.atan2(to.y);
    let mut delta = end - start;
    if delta > PI {
        delta -= 2.0 * PI;
    } else if delta <= -PI {
        delta += 2.0 * PI;
    }

    let steps = (delta.abs() / HORIZON_STEP).ceil() as usize;
    (1..steps)
        .map(|k| {
            let theta = start + delta * (k as f64) / (steps as f64);
            DVec3::new(0.0, theta.cos(), theta.sin())
        })
        .collect()
}

/// Strips the closing vertex of a ring if it repeats the first one.
fn open_ring(ring: &[DVec3]) -> &[DVec3] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first.abs_diff_eq(*last, 1e-12) => {
            &ring[..ring.len() - 1]
        }
        _ => ring,
    }
}

/// Clips a polygon ring to the visible hemisphere.
///
/// Returns `None` when nothing of the ring is visible. The returned ring is
/// open (no repeated closing vertex); cut edges are joined along the
/// horizon.
pub(crate) fn clip_ring_to_hemisphere(ring: &[DVec3]) -> Option<Vec<DVec3>> {
    let points = open_ring(ring);
    if points.len() < 3 {
        return None;
    }

    let start = points.iter().position(|p| is_inside(*p))?;
    if points.iter().all(|p| is_inside(*p)) {
        return Some(points.to_vec());
    }

    let n = points.len();
    let mut out = Vec::with_capacity(n + 8);
    let mut pending_exit: Option<DVec3> = None;

    for i in 0..n {
        let a = points[(start + i) % n];
        let b = points[(start + i + 1) % n];
        let (a_in, b_in) = (is_inside(a), is_inside(b));

        if a_in {
            out.push(a);
        }
        if a_in && !b_in {
            let exit = horizon_crossing(a, b);
            out.push(exit);
            pending_exit = Some(exit);
        } else if !a_in && b_in {
            let entry = horizon_crossing(a, b);
            if let Some(exit) = pending_exit.take() {
                out.extend(horizon_arc(exit, entry));
            }
            out.push(entry);
        }
    }

    (out.len() >= 3).then_some(out)
}

/// Splits a line into the runs that lie on the visible hemisphere.
pub(crate) fn clip_line_to_hemisphere(line: &[DVec3]) -> Vec<Vec<DVec3>> {
    let mut runs = Vec::new();
    let mut current: Vec<DVec3> = Vec::new();

    for (i, &p) in line.iter().enumerate() {
        if i > 0 {
            let prev = line[i - 1];
            match (is_inside(prev), is_inside(p)) {
                (true, false) => {
                    current.push(horizon_crossing(prev, p));
                    runs.push(std::mem::take(&mut current));
                }
                (false, true) => current.push(horizon_crossing(prev, p)),
                _ => {}
            }
        }
        if is_inside(p) {
            current.push(p);
        }
    }
    runs.push(current);

    runs.retain(|run| run.len() >= 2);
    runs
}

/// Splits a line wherever it jumps across the antimeridian.
///
/// The crossing latitude is interpolated and both halves end exactly on
/// the ±180° edge.
pub(crate) fn split_at_antimeridian(line: &[Coord<f64>]) -> Vec<Vec<Coord<f64>>> {
    let mut runs = Vec::new();
    let mut current: Vec<Coord<f64>> = Vec::new();

    for (i, &p) in line.iter().enumerate() {
        if i > 0 {
            let prev = line[i - 1];
            let jump = p.x - prev.x;
            if jump.abs() > 180.0 {
                let (edge, unwrapped) = if jump < 0.0 {
                    (180.0, p.x + 360.0)
                } else {
                    (-180.0, p.x - 360.0)
                };
                let t = (edge - prev.x) / (unwrapped - prev.x);
                let lat = prev.y + t * (p.y - prev.y);
                current.push(Coord { x: edge, y: lat });
                runs.push(std::mem::take(&mut current));
                current.push(Coord { x: -edge, y: lat });
            }
        }
        current.push(p);
    }
    runs.push(current);

    runs.retain(|run| run.len() >= 2);
    runs
}

/// Returns copies of a ring arranged so every part of it lands inside
/// [-180, 180] once drawn.
///
/// A ring that jumps across the antimeridian is unwrapped into continuous
/// longitudes and then repeated shifted by 360°, so the overflow on one
/// side reappears on the other. Rings that wind around a pole cannot be
/// unwrapped and are returned unchanged.
pub(crate) fn wrap_ring_copies(ring: &[Coord<f64>]) -> Vec<Vec<Coord<f64>>> {
    let Some(&first) = ring.first() else {
        return Vec::new();
    };

    let mut unwrapped = Vec::with_capacity(ring.len());
    let mut offset = 0.0;
    let mut prev = first.x;
    unwrapped.push(first);
    let mut jumped = false;

    for &p in &ring[1..] {
        let mut x = p.x + offset;
        while x - prev > 180.0 {
            offset -= 360.0;
            x -= 360.0;
            jumped = true;
        }
        while x - prev < -180.0 {
            offset += 360.0;
            x += 360.0;
            jumped = true;
        }
        unwrapped.push(Coord { x, y: p.y });
        prev = x;
    }

    let closes = unwrapped
        .last()
        .map(|last| (last.x - first.x).abs() <= 180.0)
        .unwrap_or(true);
    if !jumped || !closes {
        return vec![ring.to_vec()];
    }

    let min = unwrapped.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
    let max = unwrapped.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max);

    let mut copies = Vec::with_capacity(2);
    if max > 180.0 {
        copies.push(shifted(&unwrapped, -360.0));
    }
    if min < -180.0 {
        copies.push(shifted(&unwrapped, 360.0));
    }
    copies.push(unwrapped);
    copies
}

fn shifted(ring: &[Coord<f64>], dx: f64) -> Vec<Coord<f64>> {
    ring.iter().map(|c| Coord { x: c.x + dx, y: c.y }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::rotation::cartesian;

    fn view(lon: f64, lat: f64) -> DVec3 {
        cartesian(lon.to_radians(), lat.to_radians())
    }

    #[test]
    fn test_fully_visible_ring_is_unchanged() {
        let ring = vec![
            view(-10.0, -10.0),
            view(10.0, -10.0),
            view(10.0, 10.0),
            view(-10.0, -10.0),
        ];
        let clipped = clip_ring_to_hemisphere(&ring).unwrap();
        assert_eq!(clipped.len(), 3);
    }

    #[test]
    fn test_hidden_ring_is_dropped() {
        let ring = vec![view(170.0, 0.0), view(160.0, 10.0), view(150.0, 0.0), view(170.0, 0.0)];
        assert!(clip_ring_to_hemisphere(&ring).is_none());
    }

    #[test]
    fn test_straddling_ring_stays_on_visible_side() {
        let ring = vec![
            view(60.0, -20.0),
            view(120.0, -20.0),
            view(120.0, 20.0),
            view(60.0, 20.0),
            view(60.0, -20.0),
        ];
        let clipped = clip_ring_to_hemisphere(&ring).unwrap();
        assert!(clipped.len() >= 4);
        for v in &clipped {
            assert!(v.x >= -HEMISPHERE_EPSILON, "point behind horizon: {v:?}");
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
        // The cut runs along the horizon, so some points sit exactly on it.
        assert!(clipped.iter().filter(|v| v.x == 0.0).count() >= 2);
    }

    #[test]
    fn test_ring_crossing_horizon_four_times() {
        // A C shape opening eastwards: both arms poke behind the horizon
        // at 90°E, so the ring leaves and re-enters the visible side twice.
        let ring = vec![
            view(60.0, -30.0),
            view(120.0, -30.0),
            view(120.0, -10.0),
            view(70.0, -10.0),
            view(70.0, 10.0),
            view(120.0, 10.0),
            view(120.0, 30.0),
            view(60.0, 30.0),
            view(60.0, -30.0),
        ];
        let clipped = clip_ring_to_hemisphere(&ring).unwrap();
        assert!(!clipped.is_empty());
        for v in &clipped {
            assert!(v.x >= -HEMISPHERE_EPSILON, "point behind horizon: {v:?}");
            assert!((v.length() - 1.0).abs() < 1e-9);
        }

        let on_horizon: Vec<_> = clipped.iter().filter(|v| v.x == 0.0).collect();
        assert!(on_horizon.len() >= 4);
        // Each arm is closed along its own stretch of horizon; nothing
        // bridges the gap between the arms.
        let gap = 5.0_f64.to_radians().sin();
        assert!(on_horizon.iter().all(|v| v.z.abs() > gap));
        let south = on_horizon.iter().filter(|v| v.z < 0.0).count();
        assert_eq!(south * 2, on_horizon.len());
    }

    #[test]
    fn test_line_split_into_visible_runs() {
        let line: Vec<DVec3> = (-180..=180).step_by(10).map(|lon| view(lon as f64, 0.0)).collect();
        let runs = clip_line_to_hemisphere(&line);
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert!((run.first().unwrap().y + 1.0).abs() < 1e-9);
        assert!((run.last().unwrap().y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_split() {
        let line = vec![Coord { x: 170.0, y: 0.0 }, Coord { x: -170.0, y: 10.0 }];
        let runs = split_at_antimeridian(&line);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].last().unwrap().x, 180.0);
        assert!((runs[0].last().unwrap().y - 5.0).abs() < 1e-9);
        assert_eq!(runs[1].first().unwrap().x, -180.0);
    }

    #[test]
    fn test_wrapping_ring_gets_shifted_copy() {
        let ring = vec![
            Coord { x: 170.0, y: -10.0 },
            Coord { x: -170.0, y: -10.0 },
            Coord { x: -170.0, y: 10.0 },
            Coord { x: 170.0, y: 10.0 },
            Coord { x: 170.0, y: -10.0 },
        ];
        let copies = wrap_ring_copies(&ring);
        assert_eq!(copies.len(), 2);
        let max = copies[1].iter().map(|c| c.x).fold(f64::MIN, f64::max);
        assert_eq!(max, 190.0);
        let min = copies[0].iter().map(|c| c.x).fold(f64::MAX, f64::min);
        assert_eq!(min, -190.0);
    }

    #[test]
    fn test_polar_ring_is_left_alone() {
        let ring = vec![
            Coord { x: -180.0, y: -80.0 },
            Coord { x: 0.0, y: -70.0 },
            Coord { x: 180.0, y: -80.0 },
            Coord { x: 180.0, y: -90.0 },
            Coord { x: -180.0, y: -90.0 },
            Coord { x: -180.0, y: -80.0 },
        ];
        let copies = wrap_ring_copies(&ring);
        assert_eq!(copies, vec![ring]);
    }
}
