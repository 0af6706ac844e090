//! Serial channel driver for the Caissa chess gantry
//!
//! This crate owns the one physical channel to the motion controller and
//! is the only component allowed to touch it. Everything above it (the
//! planner, the compiler, the UI) is pure or channel-free.
//!
//! - [`transport`]: the hardware seam, a [`Transport`] trait with a real
//!   serial implementation and a fixed-delay simulated one
//! - [`handshake`]: the per-batch acknowledgement state machine
//! - [`channel`]: channel lifecycle, from connect banner through batches,
//!   homing, alarm clearing, and the
//!   Disconnected/Connected/Alarmed/Simulated state
//! - [`dispatcher`]: the worker thread that serializes all channel
//!   access behind a queued, blocking submission API
//! - [`config`]: TOML driver configuration
//!
//! Command batches block for as long as the physical motion takes; the
//! dispatcher worker exists so callers can decide for themselves whether
//! to wait. There is no cancellation of an in-flight batch, because the
//! gantry cannot be safely interrupted mid-travel.

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handshake;
pub mod transport;

pub use channel::{Channel, ChannelState};
pub use config::{ConfigError, DriverConfig};
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use transport::{SerialTransport, SimulatedTransport, Transport};
