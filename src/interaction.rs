//! Drag-to-rotate state machine for the globe.

use crate::geo::Rotation;
use glam::DVec2;

/// Degrees of rotation per pixel of pointer movement.
pub const DRAG_SENSITIVITY: f64 = 0.5;

/// Pointer drag state.
///
/// `Idle -> begin -> Dragging -> end -> Idle`. While dragging, every
/// rotation is computed from the values captured at `begin`, so the result
/// only depends on where the pointer is now.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start_rotation: Rotation,
        start_position: DVec2,
    },
}

impl DragState {
    /// Starts a drag, capturing the current rotation and pointer position.
    pub fn begin(&mut self, rotation: Rotation, position: DVec2) {
        *self = DragState::Dragging {
            start_rotation: rotation,
            start_position: position,
        };
    }

    /// Rotation for the pointer at `position`, or `None` when idle.
    pub fn update(&self, position: DVec2) -> Option<Rotation> {
        match *self {
            DragState::Idle => None,
            DragState::Dragging {
                start_rotation,
                start_position,
            } => Some(rotation_for_drag(start_rotation, start_position, position)),
        }
    }

    pub fn end(&mut self) {
        *self = DragState::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

/// Applies the pointer offset since drag start to the start rotation.
///
/// Horizontal movement spins around the polar axis, vertical movement tilts.
/// Roll is always reset to zero.
pub fn rotation_for_drag(
    start_rotation: Rotation,
    start_position: DVec2,
    current: DVec2,
) -> Rotation {
    let delta = current - start_position;
    Rotation::new(
        start_rotation.lambda + delta.x * DRAG_SENSITIVITY,
        start_rotation.phi - delta.y * DRAG_SENSITIVITY,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_drag_formula() {
        let start = Rotation::new(-10.0, -45.0, 0.0);
        let rotation = rotation_for_drag(start, DVec2::new(100.0, 100.0), DVec2::new(140.0, 80.0));
        assert_close(rotation.lambda, 10.0);
        assert_close(rotation.phi, -35.0);
        assert_close(rotation.gamma, 0.0);
    }

    #[test]
    fn test_gamma_is_reset() {
        let start = Rotation::new(0.0, 0.0, 30.0);
        let rotation = rotation_for_drag(start, DVec2::ZERO, DVec2::ZERO);
        assert_close(rotation.gamma, 0.0);
    }

    #[test]
    fn test_state_transitions() {
        let mut state = DragState::default();
        assert!(!state.is_dragging());
        assert_eq!(state.update(DVec2::new(5.0, 5.0)), None);

        state.begin(Rotation::default(), DVec2::new(0.0, 0.0));
        assert!(state.is_dragging());
        let rotation = state.update(DVec2::new(2.0, 4.0)).unwrap();
        assert_close(rotation.lambda, 1.0);
        assert_close(rotation.phi, -2.0);

        state.end();
        assert_eq!(state, DragState::Idle);
    }

    #[test]
    fn test_update_ignores_intermediate_positions() {
        let mut state = DragState::default();
        state.begin(Rotation::new(5.0, 5.0, 0.0), DVec2::new(50.0, 50.0));

        for x in [10.0, 300.0, -40.0, 75.0] {
            let _ = state.update(DVec2::new(x, x));
        }
        let direct = rotation_for_drag(
            Rotation::new(5.0, 5.0, 0.0),
            DVec2::new(50.0, 50.0),
            DVec2::new(60.0, 30.0),
        );
        assert_eq!(state.update(DVec2::new(60.0, 30.0)), Some(direct));
    }
}
