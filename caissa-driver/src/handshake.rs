//! Per-batch acknowledgement handshake
//!
//! Sending a batch is a small state machine: write a line, block until
//! the controller acknowledges it, repeat, then poll status until the
//! machine reports idle. "Commands accepted" and "motion physically
//! finished" are distinct facts; callers get the batch back only after
//! the second one.

use caissa_protocol::Response;

/// Phase of one batch submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to write command `index`
    Sending(usize),
    /// Awaiting acknowledgement of command `index`
    AwaitingAck(usize),
    /// All commands acknowledged; polling for motion completion
    AwaitingIdle,
    /// Batch complete and motion finished
    Done,
    /// Controller alarm halted the batch
    Alarmed(u8),
}

/// State machine for one command batch
#[derive(Debug, Clone)]
pub struct BatchHandshake {
    total: usize,
    phase: Phase,
}

impl BatchHandshake {
    /// Start a handshake for `total` commands
    pub fn new(total: usize) -> Self {
        let phase = if total == 0 {
            Phase::AwaitingIdle
        } else {
            Phase::Sending(0)
        };
        Self { total, phase }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The command at `index` has been written
    pub fn line_written(&mut self) {
        if let Phase::Sending(index) = self.phase {
            self.phase = Phase::AwaitingAck(index);
        }
    }

    /// A response line arrived while awaiting acknowledgement
    ///
    /// `ok` advances to the next command (or to idle polling after the
    /// last); an alarm terminates the batch. Unsolicited lines (status
    /// reports, messages) leave the phase unchanged.
    pub fn on_response(&mut self, response: Response) {
        if let Phase::AwaitingAck(index) = self.phase {
            match response {
                Response::Ok => {
                    self.phase = if index + 1 < self.total {
                        Phase::Sending(index + 1)
                    } else {
                        Phase::AwaitingIdle
                    };
                }
                Response::Alarm(code) => self.phase = Phase::Alarmed(code),
                _ => {}
            }
        }
    }

    /// The controller reported an idle state
    pub fn idle_confirmed(&mut self) {
        if self.phase == Phase::AwaitingIdle {
            self.phase = Phase::Done;
        }
    }

    /// True once the batch can no longer advance
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Done | Phase::Alarmed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut hs = BatchHandshake::new(2);
        assert_eq!(hs.phase(), Phase::Sending(0));
        hs.line_written();
        assert_eq!(hs.phase(), Phase::AwaitingAck(0));
        hs.on_response(Response::Ok);
        assert_eq!(hs.phase(), Phase::Sending(1));
        hs.line_written();
        hs.on_response(Response::Ok);
        assert_eq!(hs.phase(), Phase::AwaitingIdle);
        hs.idle_confirmed();
        assert_eq!(hs.phase(), Phase::Done);
        assert!(hs.is_terminal());
    }

    #[test]
    fn test_alarm_terminates() {
        let mut hs = BatchHandshake::new(4);
        hs.line_written();
        hs.on_response(Response::Ok);
        hs.line_written();
        hs.on_response(Response::Alarm(2));
        assert_eq!(hs.phase(), Phase::Alarmed(2));
        assert!(hs.is_terminal());
        // Further events cannot revive the batch
        hs.on_response(Response::Ok);
        hs.idle_confirmed();
        assert_eq!(hs.phase(), Phase::Alarmed(2));
    }

    #[test]
    fn test_unsolicited_lines_ignored() {
        let mut hs = BatchHandshake::new(1);
        hs.line_written();
        hs.on_response(Response::Message);
        hs.on_response(Response::Empty);
        assert_eq!(hs.phase(), Phase::AwaitingAck(0));
        hs.on_response(Response::Ok);
        assert_eq!(hs.phase(), Phase::AwaitingIdle);
    }

    #[test]
    fn test_empty_batch_only_waits_for_idle() {
        let mut hs = BatchHandshake::new(0);
        assert_eq!(hs.phase(), Phase::AwaitingIdle);
        hs.idle_confirmed();
        assert!(hs.is_terminal());
    }
}
