//! Board geometry
//!
//! Defines the physical coordinate system, the playing-surface extents,
//! and the bijection between board cells and half-step coordinates.

pub mod cell;
pub mod surface;

pub use cell::{Cell, InvalidCell};
pub use surface::{
    clamp_lane_x, clamp_lane_y, Coord, BOARD_MAX, BOARD_MIN, CELL_PITCH, X_LANE_MAX, X_LANE_MIN,
    Y_LANE_MAX, Y_LANE_MIN,
};
