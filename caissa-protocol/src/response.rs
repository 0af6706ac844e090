//! Response parsing for controller output
//!
//! Parsing is total: any line classifies to a [`Response`] variant and
//! never panics, so garbage on the wire degrades to `Unknown` instead of
//! taking the channel down.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Machine state token from a status report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MachineState {
    /// Stopped, ready for commands
    Idle,
    /// Executing motion
    Run,
    /// Executing a jog move
    Jog,
    /// Homing cycle in progress
    Home,
    /// Feed hold active
    Hold,
    /// Safety door open
    Door,
    /// G-code check mode
    Check,
    /// Alarm latched
    Alarm,
    /// Sleep mode
    Sleep,
}

impl MachineState {
    /// Parse a state token (the text before the first `|` in a report)
    pub fn from_token(token: &str) -> Option<Self> {
        // Hold and Door reports carry a sub-state suffix (`Hold:0`)
        let base = token.split(':').next().unwrap_or(token);
        match base {
            "Idle" => Some(MachineState::Idle),
            "Run" => Some(MachineState::Run),
            "Jog" => Some(MachineState::Jog),
            "Home" => Some(MachineState::Home),
            "Hold" => Some(MachineState::Hold),
            "Door" => Some(MachineState::Door),
            "Check" => Some(MachineState::Check),
            "Alarm" => Some(MachineState::Alarm),
            "Sleep" => Some(MachineState::Sleep),
            _ => None,
        }
    }

    /// Returns true if the machine reports motion fully stopped
    pub fn is_idle(&self) -> bool {
        matches!(self, MachineState::Idle | MachineState::Sleep)
    }
}

/// A classified controller response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Command accepted
    Ok,
    /// Command rejected with an error code
    Error(u8),
    /// Fault latched; motion halted until unlocked
    Alarm(u8),
    /// Status report with the machine state token
    Status(MachineState),
    /// Welcome banner after reset or connect
    Welcome,
    /// Informational feedback line (`[MSG:...]`)
    Message,
    /// Empty line
    Empty,
    /// Anything else
    Unknown,
}

impl Response {
    /// Returns true if this response terminates a pending command
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Response::Ok | Response::Error(_) | Response::Alarm(_)
        )
    }
}

/// Classify a single response line
pub fn parse_response(line: &str) -> Response {
    let line = line.trim();

    if line.is_empty() {
        return Response::Empty;
    }
    if line == "ok" {
        return Response::Ok;
    }
    if let Some(code) = line.strip_prefix("error:") {
        return match code.trim().parse::<u8>() {
            Ok(n) => Response::Error(n),
            Err(_) => Response::Unknown,
        };
    }
    if let Some(code) = line.strip_prefix("ALARM:") {
        return match code.trim().parse::<u8>() {
            Ok(n) => Response::Alarm(n),
            Err(_) => Response::Unknown,
        };
    }
    if let Some(report) = line.strip_prefix('<') {
        let token = report
            .split(|c| c == '|' || c == '>')
            .next()
            .unwrap_or("");
        return match MachineState::from_token(token) {
            Some(state) => Response::Status(state),
            None => Response::Unknown,
        };
    }
    if line.starts_with("Grbl ") {
        return Response::Welcome;
    }
    if line.starts_with('[') {
        return Response::Message;
    }

    Response::Unknown
}
