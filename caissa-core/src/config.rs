//! Motion configuration types
//!
//! Physical constants of one gantry build. Values here are consumed by
//! the command compiler and by the driver when scaling half-steps to
//! millimeters on the wire.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gantry motion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionConfig {
    /// Length of one half-step in millimeters (half a square width)
    pub half_step_mm: f32,
    /// Feed rate while dragging a piece, mm/min
    pub drag_feed: u16,
    /// Feed rate for unloaded travel and jogs, mm/min
    pub travel_feed: u16,
    /// Overshoot distance past the target, in half-steps per moving axis
    pub overshoot: i16,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            half_step_mm: 20.0,
            drag_feed: 1200,
            travel_feed: 3000,
            overshoot: 1,
        }
    }
}

impl MotionConfig {
    /// Millimeter position of a half-step coordinate component
    pub fn to_mm(&self, half_steps: i16) -> f32 {
        half_steps as f32 * self.half_step_mm
    }
}
