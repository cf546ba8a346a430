//! Cooperative worker task on a tokio runtime
//!
//! [`TaskSpawner`] is the tokio substrate: the worker is a spawned task reading
//! an unbounded tokio channel, and the only suspension points are the receive
//! and whatever the sinks await. [`AsyncLogger`] is the facade over it. It
//! shares the lifecycle and producer surface of [`Logger`](crate::core::Logger)
//! through [`LoggerCore`] and differs only in its `stop`, which awaits the task
//! instead of blocking a thread.

use crate::core::{
    spawner::wait_until,
    worker::{run_async_worker, AsyncReceive, Received, WorkerExit},
    AsyncSink, Envelope, LoggerCore, LoggerError, Result, Severity, Spawner, Transport,
    WorkerHandle,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct TaskSpawner {
    sinks: Option<Vec<Box<dyn AsyncSink>>>,
}

impl TaskSpawner {
    pub fn new(sinks: Vec<Box<dyn AsyncSink>>) -> Self {
        Self { sinks: Some(sinks) }
    }
}

impl Spawner for TaskSpawner {
    type Transport = TaskTransport;
    type Handle = TaskHandle;

    /// Spawn the worker task on the current tokio runtime
    fn spawn(&mut self, name: &str) -> Result<(TaskTransport, TaskHandle)> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| LoggerError::RuntimeUnavailable)?;
        let mut sinks = self
            .sinks
            .take()
            .ok_or_else(|| LoggerError::already_stopped(name))?;

        let (sender, items) = unbounded_channel();
        let cancel = CancellationToken::new();
        let mut receiver = TaskReceiver {
            items,
            cancel: cancel.clone(),
        };
        let outcome = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&outcome);
        let worker_name = name.to_string();

        let task = runtime.spawn(async move {
            let result = run_async_worker(&mut receiver, &mut sinks).await;
            if let Err(ref e) = result {
                eprintln!("[LOGGER ERROR] Worker task of '{}' stopped: {}", worker_name, e);
            }
            *slot.lock() = Some(result);
        });

        Ok((
            TaskTransport { sender },
            TaskHandle {
                name: name.to_string(),
                cancel,
                task,
                outcome,
            },
        ))
    }
}

/// Producer side; never waits, the channel is unbounded
pub struct TaskTransport {
    sender: UnboundedSender<Envelope>,
}

impl Transport for TaskTransport {
    fn send(&self, envelope: Envelope) -> Result<()> {
        self.sender
            .send(envelope)
            .map_err(|_| LoggerError::ChannelSendError)
    }
}

/// Worker side of the channel, racing the queue against the cancellation token
pub struct TaskReceiver {
    items: UnboundedReceiver<Envelope>,
    cancel: CancellationToken,
}

#[async_trait]
impl AsyncReceive for TaskReceiver {
    async fn receive(&mut self) -> Result<Received> {
        let next = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            item = self.items.recv() => item,
        };
        // None: cancelled, or every sender is gone
        Ok(next.map_or(Received::Cancelled, Received::Item))
    }
}

pub struct TaskHandle {
    name: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    outcome: Arc<Mutex<Option<Result<WorkerExit>>>>,
}

impl TaskHandle {
    /// Await the task for up to `timeout`; same contract as `join_timeout`
    pub async fn join(&mut self, timeout: Duration) -> Result<bool> {
        match tokio::time::timeout(timeout, &mut self.task).await {
            Ok(Ok(())) => self.report(),
            Ok(Err(join_err)) => Err(LoggerError::worker_failed(&self.name, join_err.to_string())),
            Err(_) => Ok(false),
        }
    }

    /// Outcome of a finished task
    fn report(&self) -> Result<bool> {
        match self.outcome.lock().take() {
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(LoggerError::worker_failed(&self.name, e.to_string())),
            None => Err(LoggerError::worker_failed(
                &self.name,
                "worker task ended without reporting an outcome",
            )),
        }
    }
}

impl WorkerHandle for TaskHandle {
    fn is_alive(&self) -> bool {
        !self.task.is_finished()
    }

    /// Blocks the calling thread; never call it from a thread driving the runtime
    fn join_timeout(&mut self, timeout: Duration) -> Result<bool> {
        if !wait_until(timeout, || self.task.is_finished()) {
            return Ok(false);
        }
        self.report()
    }

    fn terminate(&mut self) -> Result<()> {
        self.cancel.cancel();
        self.task.abort();
        Ok(())
    }
}

/// Logger delivering from a task on the current tokio runtime
pub struct AsyncLogger {
    core: LoggerCore<TaskTransport, TaskHandle>,
    spawner: Mutex<TaskSpawner>,
}

impl AsyncLogger {
    #[must_use]
    pub fn new(name: impl Into<String>, threshold: Severity, sinks: Vec<Box<dyn AsyncSink>>) -> Self {
        Self {
            core: LoggerCore::new(name, threshold),
            spawner: Mutex::new(TaskSpawner::new(sinks)),
        }
    }

    /// Spawn the worker task on the current tokio runtime
    pub fn start(&self) -> Result<()> {
        self.core.start_with(|name| self.spawner.lock().spawn(name))
    }

    /// Stop the worker task, waiting at most `timeout` for it to drain.
    ///
    /// Same contract as [`Logger::stop`](crate::core::Logger::stop): on timeout the
    /// task is cancelled and aborted, and the error is only returned when
    /// `suppress_timeout_error` is false.
    pub async fn stop(&self, timeout: Duration, suppress_timeout_error: bool) -> Result<()> {
        let mut handle = self.core.begin_stop()?;
        if handle.join(timeout).await? {
            return Ok(());
        }
        self.core.expire(&mut handle, timeout, suppress_timeout_error)
    }
}

impl Deref for AsyncLogger {
    type Target = LoggerCore<TaskTransport, TaskHandle>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl Drop for AsyncLogger {
    fn drop(&mut self) {
        if !self.core.has_worker() {
            return;
        }
        // No await here: queue the shutdown and let the task drain on its own
        let _ = self.core.begin_stop();
    }
}
