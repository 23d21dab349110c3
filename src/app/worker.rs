//! Background scan worker.
//!
//! A scan runs on its own OS thread with a single-threaded tokio runtime, so
//! the caller's thread (a terminal loop, a UI event loop) is never blocked.
//! The finished [`ScanReport`] is handed back through a channel that the
//! caller polls.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::{InitializationError, ScanError};
use crate::initialization::init_runtime;
use crate::orchestrator::ScanOptions;
use crate::providers::ProviderRegistry;
use crate::run::{run_scan, ScanReport};

type ScanOutcome = Result<ScanReport, ScanError>;

/// Everything a worker needs to run one scan.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub config: Config,
    pub registry: ProviderRegistry,
    /// Already-expanded IPs
    pub ips: Vec<String>,
    pub options: ScanOptions,
}

/// Starts scans on background threads.
pub struct ScanWorker;

impl ScanWorker {
    /// Spawns a worker thread running `request`.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Initialization` if the OS refuses to create the
    /// thread.
    pub fn spawn(request: ScanRequest) -> Result<ScanHandle, ScanError> {
        let (sender, receiver) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let thread = thread::Builder::new()
            .name("scan-worker".to_string())
            .spawn(move || {
                let outcome = match init_runtime() {
                    Ok(runtime) => runtime.block_on(run_scan(
                        &request.config,
                        &request.registry,
                        &request.ips,
                        request.options,
                        &worker_cancel,
                    )),
                    Err(e) => Err(ScanError::from(e)),
                };

                // A cancelled scan delivers nothing
                if worker_cancel.is_cancelled() {
                    debug!("Scan worker cancelled; discarding result");
                    return;
                }
                if sender.send(outcome).is_err() {
                    debug!("Scan handle dropped before the result was delivered");
                }
            })
            .map_err(InitializationError::from)?;

        Ok(ScanHandle {
            receiver: Some(receiver),
            cancel,
            thread: Some(thread),
            started: Instant::now(),
        })
    }
}

/// Caller-side view of a running scan.
///
/// Dropping the handle cancels the scan.
pub struct ScanHandle {
    receiver: Option<Receiver<ScanOutcome>>,
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
    started: Instant,
}

impl ScanHandle {
    /// Checks for a result without blocking.
    ///
    /// Returns `Some` exactly once, when the worker has finished (or died);
    /// `None` while it is still running and after the result was taken.
    pub fn poll(&mut self) -> Option<ScanOutcome> {
        let receiver = self.receiver.as_ref()?;
        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                if self.cancel.is_cancelled() {
                    Err(ScanError::Cancelled)
                } else {
                    Err(ScanError::WorkerStopped)
                }
            }
        };

        self.receiver = None;
        self.join_thread();
        Some(outcome)
    }

    /// Asks the worker to abandon its in-flight requests.
    ///
    /// The next [`poll`](Self::poll) after the worker exits reports
    /// `ScanError::Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Time since the worker was spawned.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Polls every `interval` until the scan finishes, calling `on_tick`
    /// between polls.
    pub fn wait(mut self, interval: Duration, mut on_tick: impl FnMut(&ScanHandle)) -> ScanOutcome {
        loop {
            match self.poll() {
                Some(outcome) => return outcome,
                None if self.receiver.is_none() => return Err(ScanError::WorkerStopped),
                None => {}
            }
            on_tick(&self);
            thread::sleep(interval);
        }
    }

    fn join_thread(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Scan worker thread panicked");
            }
        }
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        if self.receiver.is_some() {
            self.cancel.cancel();
        }
    }
}
