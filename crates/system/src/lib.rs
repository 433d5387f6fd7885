pub mod cpu;
pub mod memory;
#[cfg(windows)]
mod registry;
pub mod startup;
pub mod storage;
pub mod theme;

pub use cpu::{default_source, SysinfoCpu};
pub use theme::OsTheme;

use runcat_core::{CpuSource, Result, RunCatError, SystemSnapshot};
use std::time::Duration;
use sysinfo::System;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::error;

/// Owns the OS handles read on every fetch tick.
pub struct Monitor {
    cpu: Box<dyn CpuSource>,
    sys: System,
}

impl Monitor {
    pub fn new(cpu: Box<dyn CpuSource>) -> Self {
        Self { cpu, sys: System::new() }
    }

    /// Read CPU, memory and storage in one go.
    pub fn snapshot(&mut self) -> Result<SystemSnapshot> {
        Ok(SystemSnapshot {
            cpu:     self.cpu.read()?,
            memory:  memory::read_memory(&mut self.sys),
            storage: storage::read_storage(),
        })
    }
}

/// Spawn a background Tokio task that takes a [`SystemSnapshot`] every
/// `period` and forwards it through the returned channel.  The first
/// snapshot is taken one full period after the call.
///
/// OS reads run on the blocking pool so a slow counter never stalls the
/// event loop.  The task stops when the receiver is dropped or the counter
/// fails.
pub fn spawn_monitor(monitor: Monitor, period: Duration) -> mpsc::Receiver<SystemSnapshot> {
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut monitor = monitor;
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let joined = tokio::task::spawn_blocking(move || {
                let snapshot = monitor.snapshot();
                (monitor, snapshot)
            })
            .await;

            let snapshot = match joined {
                Ok((m, Ok(snapshot))) => {
                    monitor = m;
                    snapshot
                }
                Ok((_, Err(e))) => {
                    error!("System monitor stopped: {e}");
                    break;
                }
                Err(e) => {
                    error!("System monitor task panicked: {e}");
                    break;
                }
            };

            if tx.send(snapshot).await.is_err() {
                break; // all receivers dropped
            }
        }
    });

    rx
}

/// Open the platform CPU counter.  The only startup failure that is fatal.
pub fn open_monitor() -> Result<Monitor> {
    let cpu = default_source().map_err(|e| match e {
        RunCatError::CounterUnavailable(msg) => RunCatError::CounterUnavailable(msg),
        other => RunCatError::CounterUnavailable(other.to_string()),
    })?;
    Ok(Monitor::new(cpu))
}
