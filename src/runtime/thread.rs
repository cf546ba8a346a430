//! Dedicated worker thread fed by an unbounded crossbeam channel

use crate::core::{
    worker::{run_worker, Receive, Received, WorkerExit},
    Envelope, Logger, LoggerError, Result, Severity, Sink, Spawner, Transport, WorkerHandle,
};
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::any::Any;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::core::spawner::wait_until;

pub struct ThreadSpawner {
    sinks: Option<Vec<Box<dyn Sink>>>,
}

impl ThreadSpawner {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks: Some(sinks) }
    }
}

impl Spawner for ThreadSpawner {
    type Transport = ChannelTransport;
    type Handle = ThreadHandle;

    fn spawn(&mut self, name: &str) -> Result<(ChannelTransport, ThreadHandle)> {
        let mut sinks = self
            .sinks
            .take()
            .ok_or_else(|| LoggerError::already_stopped(name))?;

        let (sender, receiver) = unbounded();
        let (cancel_tx, cancel_rx) = unbounded();
        let mut queue = ChannelReceiver {
            items: receiver,
            cancel: cancel_rx,
        };

        let worker_name = name.to_string();
        let handle = thread::Builder::new()
            .name(format!("{}_logger", name))
            .spawn(move || {
                let outcome = run_worker(&mut queue, &mut sinks);
                if let Err(ref e) = outcome {
                    eprintln!("[LOGGER ERROR] Worker of '{}' stopped: {}", worker_name, e);
                }
                outcome
            })
            .map_err(|e| LoggerError::io_operation("spawning worker thread", name, e))?;

        Ok((
            ChannelTransport { sender },
            ThreadHandle {
                name: name.to_string(),
                join: Some(handle),
                cancel: cancel_tx,
            },
        ))
    }
}

pub struct ChannelTransport {
    sender: Sender<Envelope>,
}

impl Transport for ChannelTransport {
    fn send(&self, envelope: Envelope) -> Result<()> {
        self.sender
            .send(envelope)
            .map_err(|_| LoggerError::ChannelSendError)
    }
}

/// Worker side of the channel, racing the queue against a cancellation signal
pub struct ChannelReceiver {
    items: Receiver<Envelope>,
    cancel: Receiver<()>,
}

impl Receive for ChannelReceiver {
    fn receive(&mut self) -> Result<Received> {
        select! {
            recv(self.cancel) -> _ => Ok(Received::Cancelled),
            recv(self.items) -> item => Ok(match item {
                Ok(envelope) => Received::Item(envelope),
                // Every producer is gone
                Err(_) => Received::Cancelled,
            }),
        }
    }
}

pub struct ThreadHandle {
    name: String,
    join: Option<JoinHandle<Result<WorkerExit>>>,
    cancel: Sender<()>,
}

impl WorkerHandle for ThreadHandle {
    fn is_alive(&self) -> bool {
        self.join.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn join_timeout(&mut self, timeout: Duration) -> Result<bool> {
        let finished = match self.join.as_ref() {
            Some(handle) => wait_until(timeout, || handle.is_finished()),
            None => return Ok(true),
        };
        if !finished {
            return Ok(false);
        }

        let Some(handle) = self.join.take() else {
            return Ok(true);
        };
        match handle.join() {
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) => Err(LoggerError::worker_failed(&self.name, e.to_string())),
            Err(panic_info) => Err(LoggerError::worker_failed(
                &self.name,
                format!("panicked: {}", panic_message(panic_info.as_ref())),
            )),
        }
    }

    fn terminate(&mut self) -> Result<()> {
        // Threads cannot be killed; a worker parked in receive() exits and finalizes,
        // one stuck inside a sink is abandoned
        let _ = self.cancel.send(());
        self.join.take();
        Ok(())
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Logger<ThreadSpawner> {
    /// Create a logger backed by a dedicated worker thread
    #[must_use]
    pub fn threaded(
        name: impl Into<String>,
        threshold: Severity,
        sinks: Vec<Box<dyn Sink>>,
    ) -> Self {
        Self::with_spawner(name, threshold, ThreadSpawner::new(sinks))
    }
}
