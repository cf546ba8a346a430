//! Main logger implementation
//!
//! [`Logger`] is the producer-facing facade. It filters by severity, stamps the
//! time, and hands messages to whatever substrate its [`Spawner`] provides.
//! The filtering and the lifecycle live in [`LoggerCore`], which every facade
//! dereferences to. Every substrate follows the same lifecycle:
//!
//! ```text
//! NotStarted --start()--> Running --stop()--> Stopped
//! ```
//!
//! `Stopped` is terminal: `start()` on a stopped logger fails with
//! [`LoggerError::AlreadyStopped`]. Messages below the threshold are dropped
//! before any state check; any other `log()` outside `Running` fails with
//! [`LoggerError::NotRunning`].

use super::{
    envelope::Envelope,
    error::{LoggerError, Result},
    log_message::LogMessage,
    severity::Severity,
    sink::Sink,
    spawner::{Spawner, Transport, WorkerHandle},
};
use crate::runtime::{InlineSpawner, ThreadSpawner};
use parking_lot::{Mutex, RwLock};
use std::ops::Deref;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `stop()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

enum Lifecycle<T, H> {
    NotStarted,
    Running { transport: T, handle: H },
    Stopped,
}

/// State and producer surface shared by every logger facade.
///
/// Holds the name, the threshold and the lifecycle of one worker. The facades
/// ([`Logger`] and the async task logger) dereference to it and only add the
/// way they spawn and wait for their worker.
pub struct LoggerCore<T, H> {
    name: String,
    threshold: Severity,
    lifecycle: RwLock<Lifecycle<T, H>>,
}

impl<T: Transport, H: WorkerHandle> LoggerCore<T, H> {
    pub(crate) fn new(name: impl Into<String>, threshold: Severity) -> Self {
        Self {
            name: name.into(),
            threshold,
            lifecycle: RwLock::new(Lifecycle::NotStarted),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Whether the logger is started and its worker is still alive
    pub fn is_running(&self) -> bool {
        match &*self.lifecycle.read() {
            Lifecycle::Running { handle, .. } => handle.is_alive(),
            _ => false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(*self.lifecycle.read(), Lifecycle::Stopped)
    }

    pub fn log(&self, severity: Severity, text: impl Into<String>) -> Result<()> {
        if !severity.passes(self.threshold) {
            return Ok(());
        }

        match &*self.lifecycle.read() {
            Lifecycle::Running { transport, .. } => {
                transport.send(Envelope::Message(LogMessage::new(severity, text)))
            }
            _ => Err(LoggerError::not_running(&self.name)),
        }
    }

    #[inline]
    pub fn other(&self, text: impl Into<String>) -> Result<()> {
        self.log(Severity::Other, text)
    }

    #[inline]
    pub fn info(&self, text: impl Into<String>) -> Result<()> {
        self.log(Severity::Info, text)
    }

    #[inline]
    pub fn warning(&self, text: impl Into<String>) -> Result<()> {
        self.log(Severity::Warning, text)
    }

    #[inline]
    pub fn error(&self, text: impl Into<String>) -> Result<()> {
        self.log(Severity::Error, text)
    }

    #[inline]
    pub fn debug(&self, text: impl Into<String>) -> Result<()> {
        self.log(Severity::Debug, text)
    }

    /// Move to `Running` with the worker `spawn` returns.
    ///
    /// The lifecycle stays write-locked while spawning, so concurrent starts see
    /// `AlreadyRunning` rather than racing.
    pub(crate) fn start_with(&self, spawn: impl FnOnce(&str) -> Result<(T, H)>) -> Result<()> {
        let mut lifecycle = self.lifecycle.write();
        match *lifecycle {
            Lifecycle::Running { .. } => return Err(LoggerError::already_running(&self.name)),
            Lifecycle::Stopped => return Err(LoggerError::already_stopped(&self.name)),
            Lifecycle::NotStarted => {}
        }

        let (transport, handle) = spawn(&self.name)?;
        *lifecycle = Lifecycle::Running { transport, handle };
        Ok(())
    }

    /// Move to `Stopped`, queue the shutdown signal and close the queue.
    ///
    /// Returns the worker handle for the caller to wait on.
    pub(crate) fn begin_stop(&self) -> Result<H> {
        let (transport, handle) = {
            let mut lifecycle = self.lifecycle.write();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
                Lifecycle::Running { transport, handle } => (transport, handle),
                Lifecycle::NotStarted => {
                    *lifecycle = Lifecycle::NotStarted;
                    return Err(LoggerError::not_running(&self.name));
                }
                Lifecycle::Stopped => return Err(LoggerError::already_stopped(&self.name)),
            }
        };

        // A worker that already died cannot take the signal; the join reports why
        if let Err(e) = transport.send(Envelope::Shutdown) {
            eprintln!(
                "[LOGGER ERROR] Failed to signal shutdown to worker of '{}': {}",
                self.name, e
            );
        }
        drop(transport);
        Ok(handle)
    }

    /// Terminate a worker that missed its shutdown deadline
    pub(crate) fn expire(
        &self,
        handle: &mut H,
        timeout: Duration,
        suppress_timeout_error: bool,
    ) -> Result<()> {
        eprintln!(
            "[LOGGER WARNING] Worker of '{}' did not finish within {:?}, terminating it. \
             Some logs may be lost.",
            self.name, timeout
        );
        handle.terminate()?;

        if suppress_timeout_error {
            Ok(())
        } else {
            Err(LoggerError::shutdown_timeout(&self.name, timeout))
        }
    }

    pub(crate) fn has_worker(&mut self) -> bool {
        matches!(*self.lifecycle.get_mut(), Lifecycle::Running { .. })
    }
}

pub struct Logger<S: Spawner> {
    core: LoggerCore<S::Transport, S::Handle>,
    spawner: Mutex<S>,
}

impl<S: Spawner> Logger<S> {
    /// Create a logger that runs its worker on the given substrate
    #[must_use]
    pub fn with_spawner(name: impl Into<String>, threshold: Severity, spawner: S) -> Self {
        Self {
            core: LoggerCore::new(name, threshold),
            spawner: Mutex::new(spawner),
        }
    }

    /// Spawn the worker and start accepting messages
    pub fn start(&self) -> Result<()> {
        self.core.start_with(|name| self.spawner.lock().spawn(name))
    }

    /// Stop the worker, waiting at most `timeout` for it to drain.
    ///
    /// The shutdown signal is queued behind every message already accepted. If the
    /// worker has not finished when the deadline passes it is forcibly terminated,
    /// and its sinks may never be finalized; the timeout is then reported as
    /// [`LoggerError::ShutdownTimeout`] unless `suppress_timeout_error` is set.
    ///
    /// # Example
    ///
    /// ```
    /// use leveled_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let sink = MemorySink::new();
    /// let delivered = sink.handle();
    ///
    /// let logger = ThreadLogger::threaded("app", Severity::Warning, vec![Box::new(sink)]);
    /// logger.start().unwrap();
    /// logger.warning("disk almost full").unwrap();
    /// logger.debug("filtered out").unwrap();
    /// logger.stop(Duration::from_secs(5), true).unwrap();
    ///
    /// assert_eq!(delivered.texts(), vec!["disk almost full"]);
    /// ```
    pub fn stop(&self, timeout: Duration, suppress_timeout_error: bool) -> Result<()> {
        let mut handle = self.core.begin_stop()?;
        if handle.join_timeout(timeout)? {
            return Ok(());
        }
        self.core.expire(&mut handle, timeout, suppress_timeout_error)
    }
}

impl<S: Spawner> Deref for Logger<S> {
    type Target = LoggerCore<S::Transport, S::Handle>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl<S: Spawner> Drop for Logger<S> {
    fn drop(&mut self) {
        if !self.core.has_worker() {
            return;
        }

        if let Err(e) = self.stop(DEFAULT_SHUTDOWN_TIMEOUT, true) {
            eprintln!(
                "[LOGGER ERROR] Failed to stop logger '{}' during drop: {}",
                self.core.name(),
                e
            );
        }
    }
}

/// Logger delivering in the caller's thread
pub type SyncLogger = Logger<InlineSpawner>;

/// Logger delivering from a dedicated worker thread
pub type ThreadLogger = Logger<ThreadSpawner>;

/// Builder for constructing loggers with a fluent API
///
/// # Example
/// ```
/// use leveled_logger::prelude::*;
///
/// let logger = LoggerBuilder::new("app")
///     .threshold(Severity::Info)
///     .sink(ConsoleSink::new())
///     .build_threaded();
///
/// assert_eq!(logger.name(), "app");
/// assert!(!logger.is_running());
/// ```
pub struct LoggerBuilder {
    name: String,
    threshold: Severity,
    sinks: Vec<Box<dyn Sink>>,
}

impl LoggerBuilder {
    /// Create a new builder; the threshold defaults to `Debug`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: Severity::default(),
            sinks: Vec::new(),
        }
    }

    /// Set the logger threshold
    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    /// Add a sink; sinks receive messages in the order they were added
    #[must_use = "builder methods return a new value"]
    pub fn sink<T: Sink + 'static>(mut self, sink: T) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Add an already boxed sink
    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Build a logger that delivers in the caller's thread
    pub fn build_synchronous(self) -> SyncLogger {
        SyncLogger::synchronous(self.name, self.threshold, self.sinks)
    }

    /// Build a logger with a dedicated worker thread
    pub fn build_threaded(self) -> ThreadLogger {
        ThreadLogger::threaded(self.name, self.threshold, self.sinks)
    }
}
