//! Command encoding for the motion controller
//!
//! Commands are produced by the command compiler in half-step units and
//! scaled to millimeters here, where the wire format is decided.

use core::fmt::Write;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum encoded line length, excluding the newline terminator
pub const MAX_LINE_LEN: usize = 48;

/// Homing cycle request
pub const CMD_HOME: &str = "$H";

/// Alarm unlock request
pub const CMD_UNLOCK: &str = "$X";

/// Status query (sent as a bare line; the controller replies with a report)
pub const CMD_STATUS_QUERY: &str = "?";

/// Errors that can occur while encoding a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Encoded line exceeds [`MAX_LINE_LEN`]
    LineTooLong,
}

/// A single controller instruction
///
/// Coordinates and deltas are in half-steps; feed rates in mm/min.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionCommand {
    /// Absolute rapid move to a half-step coordinate
    Rapid { x: i16, y: i16 },
    /// Relative feed move by a half-step delta
    Linear { dx: i16, dy: i16, feed: u16 },
    /// Engage the electromagnet (wired to the coolant enable output)
    MagnetOn,
    /// Release the electromagnet
    MagnetOff,
}

impl MotionCommand {
    /// Encode this command as a controller line
    ///
    /// # Arguments
    /// - `half_step_mm`: length of one half-step in millimeters
    pub fn encode(&self, half_step_mm: f32) -> Result<String<MAX_LINE_LEN>, EncodeError> {
        let mut line = String::new();
        let result = match *self {
            MotionCommand::Rapid { x, y } => write!(
                line,
                "G90 G0 X{:.3} Y{:.3}",
                x as f32 * half_step_mm,
                y as f32 * half_step_mm
            ),
            MotionCommand::Linear { dx, dy, feed } => write!(
                line,
                "G91 G1 X{:.3} Y{:.3} F{}",
                dx as f32 * half_step_mm,
                dy as f32 * half_step_mm,
                feed
            ),
            MotionCommand::MagnetOn => line.push_str("M8").map_err(|_| core::fmt::Error),
            MotionCommand::MagnetOff => line.push_str("M9").map_err(|_| core::fmt::Error),
        };
        result.map_err(|_| EncodeError::LineTooLong)?;
        Ok(line)
    }

    /// Returns true if this command produces gantry motion
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            MotionCommand::Rapid { .. } | MotionCommand::Linear { .. }
        )
    }

    /// Returns true if this command drives the electromagnet
    pub fn is_magnet(&self) -> bool {
        matches!(self, MotionCommand::MagnetOn | MotionCommand::MagnetOff)
    }
}
