//! Driver configuration
//!
//! Loaded from a TOML file at startup. All timeouts are in milliseconds
//! in the file; accessors expose them as [`Duration`]s.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use caissa_core::MotionConfig;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML syntax or schema error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Channel and dispatcher configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Serial device path
    pub port: String,
    /// Serial baud rate
    pub baud: u32,
    /// Bound on waiting for a command acknowledgement (ms)
    pub ack_timeout_ms: u64,
    /// Bound on waiting for the welcome banner after connect (ms)
    pub banner_timeout_ms: u64,
    /// Bound on waiting for motion to finish after a batch (ms)
    pub motion_timeout_ms: u64,
    /// Interval between idle status polls (ms)
    pub idle_poll_ms: u64,
    /// Bound on a homing cycle (ms)
    pub homing_timeout_ms: u64,
    /// Fixed backoff between reconnect attempts (ms)
    pub reconnect_backoff_ms: u64,
    /// Artificial per-line delay in simulated mode (ms)
    pub simulated_delay_ms: u64,
    /// Fall back to simulated mode when no hardware answers at startup
    pub simulate_on_missing_hardware: bool,
    /// Gantry motion parameters
    pub motion: MotionConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_owned(),
            baud: 115_200,
            ack_timeout_ms: 2_000,
            banner_timeout_ms: 3_000,
            motion_timeout_ms: 30_000,
            idle_poll_ms: 200,
            homing_timeout_ms: 30_000,
            reconnect_backoff_ms: 5_000,
            simulated_delay_ms: 150,
            simulate_on_missing_hardware: true,
            motion: MotionConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Parse a TOML configuration string
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    pub fn banner_timeout(&self) -> Duration {
        Duration::from_millis(self.banner_timeout_ms)
    }

    pub fn motion_timeout(&self) -> Duration {
        Duration::from_millis(self.motion_timeout_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub fn homing_timeout(&self) -> Duration {
        Duration::from_millis(self.homing_timeout_ms)
    }

    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_millis(self.reconnect_backoff_ms)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}
