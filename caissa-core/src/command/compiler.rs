//! Command compiler
//!
//! Turns a compressed waypoint path into the ordered controller commands
//! for one piece drag: an absolute rapid to the pickup point, magnet
//! engagement, relative feed moves, and an overshoot-and-retract pair
//! that seats the piece precisely on the magnet-release point.

use heapless::Vec;

use caissa_protocol::MotionCommand;

use crate::board::Coord;
use crate::config::MotionConfig;
use crate::motion::Path;
use crate::plan::MovePlan;

/// Maximum commands for a single path
pub const MAX_PATH_COMMANDS: usize = 16;

/// Maximum commands for a full move plan
pub const MAX_PLAN_COMMANDS: usize = 48;

/// Electromagnet handling policy
///
/// The active policy is decided by UI state outside this core (human vs.
/// engine turn) and injected per compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagnetPolicy {
    /// Engage after reaching the pickup point, release after seating
    #[default]
    MoveMode,
    /// Magnet held on externally; emit no magnet directives
    AlwaysOn,
    /// Magnet held off externally; emit no magnet directives
    AlwaysOff,
}

/// Errors from command compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompileError {
    /// Command capacity exceeded
    Capacity,
}

fn push<const N: usize>(
    out: &mut Vec<MotionCommand, N>,
    cmd: MotionCommand,
) -> Result<(), CompileError> {
    out.push(cmd).map_err(|_| CompileError::Capacity)
}

/// Compile one piece drag into controller commands
pub fn compile(
    path: &Path,
    policy: MagnetPolicy,
    cfg: &MotionConfig,
) -> Result<Vec<MotionCommand, MAX_PATH_COMMANDS>, CompileError> {
    let mut out = Vec::new();
    let start = path.start();
    push(&mut out, MotionCommand::Rapid {
        x: start.x,
        y: start.y,
    })?;

    // A stationary path is just a positioning rapid; nothing to grab
    if path.is_empty() {
        return Ok(out);
    }

    if policy == MagnetPolicy::MoveMode {
        push(&mut out, MotionCommand::MagnetOn)?;
    }

    let last_index = path.len() - 1;
    for (i, &v) in path.vectors().iter().enumerate() {
        if i == last_index {
            // Overshoot past the target in the direction of travel,
            // then retract to seat the piece on the release point
            let overshoot = Coord::new(
                v.x.signum() * cfg.overshoot,
                v.y.signum() * cfg.overshoot,
            );
            let shoot = v + overshoot;
            push(&mut out, MotionCommand::Linear {
                dx: shoot.x,
                dy: shoot.y,
                feed: cfg.drag_feed,
            })?;
            if !overshoot.is_zero() {
                push(&mut out, MotionCommand::Linear {
                    dx: -overshoot.x,
                    dy: -overshoot.y,
                    feed: cfg.drag_feed,
                })?;
            }
        } else {
            push(&mut out, MotionCommand::Linear {
                dx: v.x,
                dy: v.y,
                feed: cfg.drag_feed,
            })?;
        }
    }

    if policy == MagnetPolicy::MoveMode {
        push(&mut out, MotionCommand::MagnetOff)?;
    }
    Ok(out)
}

/// Compile every drag of a move plan, in execution order
pub fn compile_plan(
    plan: &MovePlan,
    policy: MagnetPolicy,
    cfg: &MotionConfig,
) -> Result<Vec<MotionCommand, MAX_PLAN_COMMANDS>, CompileError> {
    let mut out = Vec::new();
    for path in plan.paths() {
        for cmd in compile(path, policy, cfg)? {
            out.push(cmd).map_err(|_| CompileError::Capacity)?;
        }
    }
    Ok(out)
}
