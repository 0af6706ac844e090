//! Channel lifecycle and batch execution
//!
//! The channel wraps one transport and tracks the controller link state.
//! All state transitions live here: connect handshakes, alarm latching,
//! teardown on I/O faults, and the simulated no-hardware mode.

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use caissa_core::MotionConfig;
use caissa_protocol::{
    parse_response, MotionCommand, Response, CMD_HOME, CMD_STATUS_QUERY, CMD_UNLOCK,
};

use crate::config::DriverConfig;
use crate::error::DispatchError;
use crate::handshake::{BatchHandshake, Phase};
use crate::transport::{SerialTransport, SimulatedTransport, Transport};

/// Link state of the one physical channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No live connection; a reconnect is scheduled
    Disconnected,
    /// Handshake complete; batches accepted
    Connected,
    /// Controller alarm latched; only an explicit clear is accepted
    Alarmed,
    /// No hardware; sends are fixed-delay no-ops for UI testing
    Simulated,
}

/// Exclusive owner of the motion-controller link
///
/// Nothing else in the system touches the transport. The dispatcher
/// serializes access to this struct on its worker thread.
pub struct Channel {
    transport: Box<dyn Transport>,
    cfg: DriverConfig,
    state: ChannelState,
}

impl Channel {
    /// Wrap an arbitrary transport (used by tests and custom hardware)
    pub fn new(transport: Box<dyn Transport>, cfg: DriverConfig) -> Self {
        Self {
            transport,
            cfg,
            state: ChannelState::Disconnected,
        }
    }

    /// Channel over the configured serial port
    pub fn serial(cfg: DriverConfig) -> Self {
        let transport = SerialTransport::new(&cfg.port, cfg.baud);
        Self::new(Box::new(transport), cfg)
    }

    /// Channel over the no-hardware simulation
    pub fn simulated(cfg: DriverConfig) -> Self {
        let transport = SimulatedTransport::new(cfg.simulated_delay());
        Self::new(Box::new(transport), cfg)
    }

    /// Current link state
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Driver configuration
    pub fn config(&self) -> &DriverConfig {
        &self.cfg
    }

    /// Gantry motion parameters
    pub fn motion_config(&self) -> &MotionConfig {
        &self.cfg.motion
    }

    /// Run the connect handshake: open the device and wait for the
    /// controller's welcome banner
    pub fn connect(&mut self) -> Result<(), DispatchError> {
        self.state = ChannelState::Disconnected;
        if let Err(e) = self.transport.open() {
            warn!("channel open failed: {e}");
            return Err(DispatchError::Channel(e));
        }

        let deadline = Instant::now() + self.cfg.banner_timeout();
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(DispatchError::Timeout {
                    line: "welcome banner".to_owned(),
                });
            }
            // Lines before the banner are reset noise; skip them
            if let Some(Response::Welcome) = self.read_response(deadline - now)? {
                break;
            }
        }

        self.state = if self.transport.is_simulated() {
            ChannelState::Simulated
        } else {
            ChannelState::Connected
        };
        info!("channel up ({:?})", self.state);
        Ok(())
    }

    /// Swap the transport for the simulation after hardware probing fails
    pub fn fall_back_to_simulated(&mut self) -> Result<(), DispatchError> {
        info!("no hardware found; entering simulated mode");
        self.transport = Box::new(SimulatedTransport::new(self.cfg.simulated_delay()));
        self.connect()
    }

    /// Execute one command batch under the acknowledgement handshake
    ///
    /// Blocks until every command is acknowledged and the controller
    /// reports motion finished. An alarm response latches the channel and
    /// guarantees no later command of the batch is written.
    pub fn send_batch(&mut self, commands: &[MotionCommand]) -> Result<(), DispatchError> {
        self.check_accepting()?;

        let mut lines = Vec::with_capacity(commands.len());
        for cmd in commands {
            let encoded = cmd
                .encode(self.cfg.motion.half_step_mm)
                .map_err(|_| DispatchError::Encode)?;
            lines.push(encoded.as_str().to_owned());
        }

        let mut hs = BatchHandshake::new(lines.len());
        while !hs.is_terminal() {
            match hs.phase() {
                Phase::Sending(i) => {
                    self.write_line(&lines[i])?;
                    hs.line_written();
                }
                Phase::AwaitingAck(i) => {
                    let response = self.next_response(&lines[i], self.cfg.ack_timeout())?;
                    if let Response::Error(code) = response {
                        warn!("batch abandoned: `{}` rejected ({code})", lines[i]);
                        return Err(DispatchError::Rejected {
                            code,
                            line: lines[i].clone(),
                        });
                    }
                    hs.on_response(response);
                }
                Phase::AwaitingIdle => {
                    self.await_idle()?;
                    hs.idle_confirmed();
                }
                Phase::Done | Phase::Alarmed(_) => break,
            }
        }

        match hs.phase() {
            Phase::Alarmed(code) => {
                error!("controller alarm {code}; channel latched");
                self.state = ChannelState::Alarmed;
                Err(DispatchError::Alarm { code })
            }
            _ => Ok(()),
        }
    }

    /// Run the homing cycle and wait for it to finish
    pub fn home(&mut self) -> Result<(), DispatchError> {
        self.check_accepting()?;
        info!("homing");
        self.write_line(CMD_HOME)?;
        self.await_ack(CMD_HOME, self.cfg.homing_timeout())?;
        self.await_idle()
    }

    /// Clear a latched alarm and return the channel to service
    pub fn clear_alarm(&mut self) -> Result<(), DispatchError> {
        if self.state == ChannelState::Disconnected {
            return Err(DispatchError::NotConnected);
        }
        self.write_line(CMD_UNLOCK)?;
        self.await_ack(CMD_UNLOCK, self.cfg.ack_timeout())?;
        if self.state == ChannelState::Alarmed {
            info!("alarm cleared");
            self.state = ChannelState::Connected;
        }
        Ok(())
    }

    /// Single relative jog at travel feed, for the manual-control surface
    pub fn jog(&mut self, dx: i16, dy: i16) -> Result<(), DispatchError> {
        let cmd = MotionCommand::Linear {
            dx,
            dy,
            feed: self.cfg.motion.travel_feed,
        };
        self.send_batch(&[cmd])
    }

    fn check_accepting(&self) -> Result<(), DispatchError> {
        match self.state {
            ChannelState::Connected | ChannelState::Simulated => Ok(()),
            ChannelState::Disconnected => Err(DispatchError::NotConnected),
            ChannelState::Alarmed => Err(DispatchError::AlarmLatched),
        }
    }

    /// Poll status until the controller reports motion fully stopped
    ///
    /// Separates "commands accepted" from "motion physically finished";
    /// batches complete only after this returns.
    fn await_idle(&mut self) -> Result<(), DispatchError> {
        let deadline = Instant::now() + self.cfg.motion_timeout();
        loop {
            if Instant::now() >= deadline {
                return Err(DispatchError::Timeout {
                    line: CMD_STATUS_QUERY.to_owned(),
                });
            }
            self.write_line(CMD_STATUS_QUERY)?;

            let poll_until = (Instant::now() + self.cfg.idle_poll()).min(deadline);
            loop {
                let now = Instant::now();
                if now >= poll_until {
                    break;
                }
                match self.read_response(poll_until - now)? {
                    Some(Response::Status(state)) if state.is_idle() => return Ok(()),
                    Some(Response::Alarm(code)) => {
                        self.state = ChannelState::Alarmed;
                        return Err(DispatchError::Alarm { code });
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }
    }

    /// Block until a terminal response arrives for `line`
    fn next_response(
        &mut self,
        line: &str,
        timeout: Duration,
    ) -> Result<Response, DispatchError> {
        let deadline = Instant::now() + timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                warn!("batch abandoned: no acknowledgement for `{line}`");
                return Err(DispatchError::Timeout {
                    line: line.to_owned(),
                });
            }
            if let Some(response) = self.read_response(deadline - now)? {
                if response.is_terminal() {
                    return Ok(response);
                }
            }
        }
    }

    fn await_ack(&mut self, line: &str, timeout: Duration) -> Result<(), DispatchError> {
        match self.next_response(line, timeout)? {
            Response::Ok => Ok(()),
            Response::Alarm(code) => {
                self.state = ChannelState::Alarmed;
                Err(DispatchError::Alarm { code })
            }
            Response::Error(code) => Err(DispatchError::Rejected {
                code,
                line: line.to_owned(),
            }),
            _ => Ok(()),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), DispatchError> {
        debug!("send: {line}");
        match self.transport.write_line(line) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.teardown(&e);
                Err(DispatchError::Channel(e))
            }
        }
    }

    fn read_response(&mut self, timeout: Duration) -> Result<Option<Response>, DispatchError> {
        match self.transport.read_line(timeout) {
            Ok(Some(line)) => {
                debug!("recv: {line}");
                Ok(Some(parse_response(&line)))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.teardown(&e);
                Err(DispatchError::Channel(e))
            }
        }
    }

    fn teardown(&mut self, cause: &std::io::Error) {
        warn!("channel fault ({cause}); tearing down");
        self.state = ChannelState::Disconnected;
    }
}
