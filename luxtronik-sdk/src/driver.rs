//! Background worker that owns the engine
//!
//! Periodic update cycles and user commands are delivered to a single worker
//! thread through one channel, so they never overlap.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use luxtronik_state::{CommandPayload, EntityId, SwitchCommand};
use tracing::{debug, error, info, warn};

use crate::config::DriverConfig;
use crate::engine::{CycleReport, HeatPump};
use crate::error::{Result, SdkError};
use crate::sink::DeviceSink;

/// Messages sent to the worker
#[derive(Debug)]
pub enum DriverMessage {
    /// Apply a user command to a device
    Command { id: EntityId, payload: CommandPayload },
    /// Stop the worker after the current operation
    Shutdown,
}

/// Cloneable handle for delivering host callbacks to the worker
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: mpsc::Sender<DriverMessage>,
}

impl DriverHandle {
    pub fn send_command(&self, id: EntityId, payload: CommandPayload) -> Result<()> {
        self.tx
            .send(DriverMessage::Command { id, payload })
            .map_err(|_| SdkError::DriverStopped)
    }

    /// Host command callback: unit number, command name and level
    pub fn on_command(&self, unit: u32, command: &str, level: f64) -> Result<()> {
        debug!(unit, command, level, "command received");
        self.send_command(
            EntityId(unit),
            CommandPayload {
                command: Some(SwitchCommand::parse(command)),
                level: Some(level),
            },
        )
    }
}

/// A running driver: one worker thread and its message channel
///
/// The worker registers devices and runs a first update cycle as soon as it
/// starts, then runs one cycle per poll interval. Dropping the driver stops
/// the worker and waits for it.
pub struct Driver {
    handle: DriverHandle,
    worker: Option<JoinHandle<()>>,
}

impl Driver {
    /// Start a driver for `config`, publishing into `sink`
    pub fn start<S>(config: &DriverConfig, sink: S) -> Result<Self>
    where
        S: DeviceSink + Send + 'static,
    {
        let heat_pump = HeatPump::from_config(config, sink)?;
        info!(
            address = %config.address,
            port = config.port,
            poll_interval = config.poll_interval,
            "starting driver"
        );
        Ok(Self::spawn(heat_pump, config.poll_interval()))
    }

    /// Run an engine on a new worker thread
    pub fn spawn<S>(heat_pump: HeatPump<S>, poll_interval: Duration) -> Self
    where
        S: DeviceSink + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || run_worker(heat_pump, rx, poll_interval));

        Self {
            handle: DriverHandle { tx },
            worker: Some(worker),
        }
    }

    pub fn handle(&self) -> DriverHandle {
        self.handle.clone()
    }

    /// Stop the worker and wait for it to finish
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.handle.tx.send(DriverMessage::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("driver worker panicked");
            }
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<S: DeviceSink>(mut heat_pump: HeatPump<S>, rx: mpsc::Receiver<DriverMessage>, poll_interval: Duration) {
    let created = heat_pump.register_devices();
    info!(created, "devices registered");
    log_cycle(&heat_pump.update_all());

    let mut next_cycle = Instant::now().checked_add(poll_interval);
    loop {
        let received = match next_cycle {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            // Interval too long to schedule: only messages wake the worker
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(DriverMessage::Command { id, payload }) => {
                if let Err(e) = heat_pump.handle_command(id, &payload) {
                    error!(device = %id, error = %e, "command failed");
                }
            }
            Ok(DriverMessage::Shutdown) => break,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("all driver handles dropped");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                log_cycle(&heat_pump.update_all());
                next_cycle = Instant::now().checked_add(poll_interval);
            }
        }
    }

    info!("driver stopped");
}

fn log_cycle(report: &CycleReport) {
    debug!(
        updated = report.updated(),
        complete = report.is_complete(),
        "update cycle finished"
    );
}
