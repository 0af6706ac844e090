//! Driver error types
//!
//! Move-level failures are surfaced to the caller, never silently
//! retried: resending a partially executed physical move could duplicate
//! motion. The only local recovery is channel reconnection and alarm
//! clearing.

use thiserror::Error;

/// Errors surfaced by the channel and dispatcher
#[derive(Debug, Error)]
pub enum DispatchError {
    /// I/O failure; the channel is torn down and a reconnect scheduled
    #[error("channel fault: {0}")]
    Channel(#[from] std::io::Error),

    /// Controller reported an alarm; the batch halted and the channel is
    /// latched until explicitly cleared
    #[error("controller alarm {code} halted the batch")]
    Alarm { code: u8 },

    /// Controller rejected a command line; the batch is abandoned but
    /// nothing is physically latched
    #[error("controller rejected `{line}` with error {code}")]
    Rejected { code: u8, line: String },

    /// No acknowledgement within the configured bound; batch abandoned
    #[error("timed out waiting for acknowledgement of `{line}`")]
    Timeout { line: String },

    /// The channel is not connected
    #[error("channel is not connected")]
    NotConnected,

    /// An alarm is latched; it must be cleared before new batches
    #[error("alarm latched; clear it before submitting new batches")]
    AlarmLatched,

    /// The dispatcher worker has shut down
    #[error("dispatcher worker has shut down")]
    WorkerGone,

    /// A command could not be encoded for the wire
    #[error("command exceeds the wire line length")]
    Encode,
}
