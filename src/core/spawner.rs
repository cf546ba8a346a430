//! Capabilities a concurrency substrate provides to the logger facade
//!
//! A substrate is a [`Spawner`] that starts a worker and hands back the producer
//! side of its queue (a [`Transport`]) together with a [`WorkerHandle`] used to
//! wait for, or forcibly end, that worker.

use super::{envelope::Envelope, error::Result};
use std::thread;
use std::time::{Duration, Instant};

/// Producer half of a delivery queue
pub trait Transport: Send + Sync {
    fn send(&self, envelope: Envelope) -> Result<()>;
}

/// Control over a spawned worker
pub trait WorkerHandle: Send + Sync {
    fn is_alive(&self) -> bool;

    /// Wait up to `timeout` for the worker to finish.
    ///
    /// Returns `Ok(true)` on clean completion and `Ok(false)` when the deadline
    /// passed. A worker that ended with an error, panic or failing exit status is
    /// reported as [`LoggerError::WorkerFailed`](super::LoggerError::WorkerFailed).
    fn join_timeout(&mut self, timeout: Duration) -> Result<bool>;

    /// Hard-stop the worker. Sinks may not be finalized.
    fn terminate(&mut self) -> Result<()>;
}

/// Starts workers on one concurrency substrate
pub trait Spawner: Send {
    type Transport: Transport;
    type Handle: WorkerHandle;

    fn spawn(&mut self, name: &str) -> Result<(Self::Transport, Self::Handle)>;
}

/// Poll interval used while waiting on a worker
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Poll `finished` until it returns true or `timeout` elapses
pub(crate) fn wait_until(timeout: Duration, mut finished: impl FnMut() -> bool) -> bool {
    let start = Instant::now();

    loop {
        if finished() {
            return true;
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return false;
        }

        // Small sleep to avoid busy-waiting, never past the deadline
        thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
    }
}
