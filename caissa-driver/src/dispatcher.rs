//! Queued command dispatch on a dedicated worker
//!
//! Command batches block for seconds while motion completes, so the
//! channel lives on its own worker thread. Callers submit jobs over a
//! rendezvous queue and block for the result; concurrent callers (jogs
//! from a manual-control surface, in-game moves, homing) queue rather
//! than interleave writes. Reconnect attempts run on a fixed-backoff
//! tick and never compete with a job in progress.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use log::{info, warn};

use caissa_protocol::MotionCommand;

use crate::channel::{Channel, ChannelState};
use crate::config::DriverConfig;
use crate::error::DispatchError;

enum JobKind {
    Batch(Vec<MotionCommand>),
    Home,
    ClearAlarm,
    Jog { dx: i16, dy: i16 },
}

struct Job {
    kind: JobKind,
    reply: Sender<Result<(), DispatchError>>,
}

/// Handle to the dispatch worker
///
/// Cloneable submission is deliberately absent: one handle per consumer
/// keeps ownership of shutdown unambiguous. All methods block until the
/// worker finishes the job; there is no cancellation of an in-flight
/// batch.
pub struct Dispatcher {
    jobs: Option<Sender<Job>>,
    state: Arc<Mutex<ChannelState>>,
    worker: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Connect over the configured serial port and start the worker
    ///
    /// When no hardware answers and the configuration allows it, the
    /// dispatcher falls back to simulated mode instead of failing.
    pub fn connect(cfg: DriverConfig) -> Result<Self, DispatchError> {
        Self::spawn(Channel::serial(cfg))
    }

    /// Start the worker for an already-built channel
    pub fn spawn(mut channel: Channel) -> Result<Self, DispatchError> {
        if channel.state() == ChannelState::Disconnected {
            if let Err(e) = channel.connect() {
                if channel.config().simulate_on_missing_hardware {
                    warn!("startup connect failed ({e}); using simulated mode");
                    channel.fall_back_to_simulated()?;
                } else {
                    warn!("startup connect failed ({e}); will keep retrying");
                }
            }
        }

        let backoff = channel.config().reconnect_backoff();
        let state = Arc::new(Mutex::new(channel.state()));
        let shared = Arc::clone(&state);
        let (jobs_tx, jobs_rx) = bounded::<Job>(0);

        let worker = thread::Builder::new()
            .name("caissa-dispatch".to_owned())
            .spawn(move || worker_loop(channel, jobs_rx, shared, backoff))
            .map_err(DispatchError::Channel)?;

        Ok(Self {
            jobs: Some(jobs_tx),
            state,
            worker: Some(worker),
        })
    }

    /// Execute a command batch; blocks until motion finishes
    pub fn dispatch(&self, commands: &[MotionCommand]) -> Result<(), DispatchError> {
        self.submit(JobKind::Batch(commands.to_vec()))
    }

    /// Run the homing cycle
    pub fn home(&self) -> Result<(), DispatchError> {
        self.submit(JobKind::Home)
    }

    /// Clear a latched alarm
    pub fn clear_alarm(&self) -> Result<(), DispatchError> {
        self.submit(JobKind::ClearAlarm)
    }

    /// Single relative jog at travel feed
    pub fn jog(&self, dx: i16, dy: i16) -> Result<(), DispatchError> {
        self.submit(JobKind::Jog { dx, dy })
    }

    /// Last published channel state, for status display
    pub fn state(&self) -> ChannelState {
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn submit(&self, kind: JobKind) -> Result<(), DispatchError> {
        let jobs = self.jobs.as_ref().ok_or(DispatchError::WorkerGone)?;
        let (reply_tx, reply_rx) = bounded(1);
        jobs.send(Job {
            kind,
            reply: reply_tx,
        })
        .map_err(|_| DispatchError::WorkerGone)?;
        reply_rx.recv().map_err(|_| DispatchError::WorkerGone)?
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Closing the queue lets the worker drain and exit
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    mut channel: Channel,
    jobs: Receiver<Job>,
    state: Arc<Mutex<ChannelState>>,
    backoff: Duration,
) {
    let reconnect = tick(backoff);
    loop {
        select! {
            recv(jobs) -> msg => match msg {
                Ok(job) => {
                    let result = run_job(&mut channel, job.kind);
                    publish(&state, channel.state());
                    // A caller that stopped waiting just drops the result
                    let _ = job.reply.send(result);
                }
                Err(_) => break,
            },
            recv(reconnect) -> _ => {
                if channel.state() == ChannelState::Disconnected {
                    attempt_reconnect(&mut channel);
                    publish(&state, channel.state());
                }
            }
        }
    }
}

fn run_job(channel: &mut Channel, kind: JobKind) -> Result<(), DispatchError> {
    match kind {
        JobKind::Batch(commands) => channel.send_batch(&commands),
        JobKind::Home => channel.home(),
        JobKind::ClearAlarm => channel.clear_alarm(),
        JobKind::Jog { dx, dy } => channel.jog(dx, dy),
    }
}

/// Reconnect and re-home so the controller's position is trustworthy
/// again before the channel returns to service
fn attempt_reconnect(channel: &mut Channel) {
    info!("reconnect attempt");
    match channel.connect().and_then(|()| channel.home()) {
        Ok(()) => info!("channel restored"),
        Err(e) => warn!("reconnect failed: {e}"),
    }
}

fn publish(state: &Arc<Mutex<ChannelState>>, value: ChannelState) {
    *state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_dispatcher() -> Dispatcher {
        let cfg = DriverConfig {
            simulated_delay_ms: 0,
            reconnect_backoff_ms: 10,
            ..Default::default()
        };
        Dispatcher::spawn(Channel::simulated(cfg)).unwrap()
    }

    #[test]
    fn test_simulated_dispatch() {
        let dispatcher = sim_dispatcher();
        assert_eq!(dispatcher.state(), ChannelState::Simulated);
        let batch = [
            MotionCommand::Rapid { x: 0, y: 0 },
            MotionCommand::MagnetOn,
            MotionCommand::Linear { dx: 2, dy: 0, feed: 1200 },
            MotionCommand::MagnetOff,
        ];
        dispatcher.dispatch(&batch).unwrap();
        dispatcher.home().unwrap();
        dispatcher.jog(1, 1).unwrap();
    }

    #[test]
    fn test_worker_survives_many_submissions() {
        let dispatcher = sim_dispatcher();
        for _ in 0..16 {
            dispatcher.dispatch(&[MotionCommand::MagnetOn]).unwrap();
        }
        assert_eq!(dispatcher.state(), ChannelState::Simulated);
    }

    #[test]
    fn test_shutdown_on_drop() {
        let dispatcher = sim_dispatcher();
        dispatcher.dispatch(&[MotionCommand::MagnetOff]).unwrap();
        drop(dispatcher);
        // Dropping joins the worker; nothing to assert beyond no deadlock
    }
}
