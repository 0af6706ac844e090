//! Motion-controller wire protocol for the Caissa gantry
//!
//! This crate defines the plain-text, line-oriented protocol spoken to the
//! two-axis motion controller. The protocol is deliberately minimal: every
//! command is a single newline-terminated line, and every command is
//! acknowledged before the next one is written.
//!
//! # Protocol Overview
//!
//! Commands (host → controller):
//! ```text
//! G90 G0 X<mm> Y<mm>          absolute rapid move
//! G91 G1 X<mm> Y<mm> F<feed>  relative feed move
//! M8 / M9                     magnet engage / release
//! $H                          homing cycle
//! $X                          alarm unlock
//! ?                           status query (single byte, no newline echo)
//! ```
//!
//! Responses (controller → host):
//! ```text
//! ok                          command accepted
//! error:<n>                   command rejected
//! ALARM:<n>                   fault latched, motion halted
//! <Idle|...> / <Run|...>      status report
//! Grbl 1.1h ['$' for help]    welcome banner after reset
//! ```
//!
//! Coordinates on the wire are millimeters; the planning layers work in
//! integer half-steps and scale by the configured half-step length at
//! encode time.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod response;

pub use command::{EncodeError, MotionCommand, CMD_HOME, CMD_STATUS_QUERY, CMD_UNLOCK, MAX_LINE_LEN};
pub use response::{parse_response, MachineState, Response};
