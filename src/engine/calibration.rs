//! Axis calibration: remapping which physical axis drives scrolling.
//!
//! Controllers with non-standard layouts report the vertical stick on odd
//! indices. Instead of a fixed mapping table, the user deflects the stick
//! they want and clicks it; whichever axis shows the greatest magnitude at
//! that instant becomes the slot's index.

use tracing::info;

use crate::input::InputFrame;

/// Which calibration slot a request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickSlot {
    Left,
    Right,
}

/// Session-wide mapping from stick slots to raw axis indices.
///
/// Mutated only by an explicit calibration action; lives for the session,
/// never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisAssignment {
    pub left: usize,
    pub right: usize,
}

impl AxisAssignment {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    pub fn assign(&mut self, slot: StickSlot, index: usize) {
        match slot {
            StickSlot::Left => self.left = index,
            StickSlot::Right => self.right = index,
        }
        info!("{:?} stick axis calibrated to index {}", slot, index);
    }
}

/// Result of a calibration pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DominantAxis {
    pub index: usize,
    pub value: f32,
}

/// Picks the axis with the greatest absolute deflection in `frame`.
///
/// All axes near zero defaults to index 0 rather than failing; a no-op
/// calibration beats an error mid-session.
pub fn pick_dominant_axis(frame: &InputFrame) -> DominantAxis {
    let mut best_index = 0;
    let mut best_magnitude = 0.0_f32;
    for (index, value) in frame.axes.iter().enumerate() {
        if value.abs() > best_magnitude {
            best_magnitude = value.abs();
            best_index = index;
        }
    }
    DominantAxis {
        index: best_index,
        value: frame.axis(best_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_axes(axes: Vec<f32>) -> InputFrame {
        InputFrame {
            axes,
            buttons: Vec::new(),
        }
    }

    #[test]
    fn picks_axis_with_greatest_magnitude() {
        let frame = frame_with_axes(vec![0.1, -0.9, 0.3, 0.5]);
        let pick = pick_dominant_axis(&frame);
        assert_eq!(pick.index, 1);
        assert_eq!(pick.value, -0.9);
    }

    #[test]
    fn all_axes_near_zero_defaults_to_first() {
        let frame = frame_with_axes(vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(pick_dominant_axis(&frame).index, 0);

        let empty = frame_with_axes(Vec::new());
        assert_eq!(pick_dominant_axis(&empty).index, 0);
        assert_eq!(pick_dominant_axis(&empty).value, 0.0);
    }

    #[test]
    fn assignment_updates_requested_slot_only() {
        let mut assignment = AxisAssignment::new(1, 3);
        assignment.assign(StickSlot::Right, 5);
        assert_eq!(assignment.left, 1);
        assert_eq!(assignment.right, 5);
    }
}
