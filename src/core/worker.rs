//! Worker loops shared by every substrate
//!
//! The worker owns its sinks for the whole run: it initializes them, drains the
//! delivery queue dispatching every message to every sink in registration order,
//! and finalizes them once the queue yields `Shutdown` or the receive is cancelled.
//! [`run_worker`] drives [`Sink`]s from a blocking [`Receive`];
//! [`run_async_worker`] is the same loop over [`AsyncSink`]s and an
//! [`AsyncReceive`].
//!
//! Sink errors are not isolated. The first failing `initialize`, `deliver` or
//! `finalize` aborts the loop and is returned wrapped in
//! [`LoggerError::SinkFailure`]; sinks after the failing one are not finalized.

use super::{
    async_sink::AsyncSink,
    envelope::Envelope,
    error::{LoggerError, Result},
    log_message::LogMessage,
    sink::Sink,
};
use async_trait::async_trait;

/// Outcome of one blocking receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Item(Envelope),
    /// Cancellation was requested, or every producer went away
    Cancelled,
}

/// Receiving half of a delivery queue, as seen by the worker
pub trait Receive {
    /// Block until an item is available or the receive is cancelled
    fn receive(&mut self) -> Result<Received>;
}

/// Why a worker loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    Shutdown,
    Cancelled,
}

/// Run the worker loop until shutdown or cancellation
pub fn run_worker<R>(receiver: &mut R, sinks: &mut [Box<dyn Sink>]) -> Result<WorkerExit>
where
    R: Receive + ?Sized,
{
    initialize_all(sinks)?;

    let exit = loop {
        match receiver.receive()? {
            Received::Item(Envelope::Message(message)) => dispatch(sinks, &message)?,
            Received::Item(Envelope::Shutdown) => break WorkerExit::Shutdown,
            Received::Cancelled => break WorkerExit::Cancelled,
        }
    };

    finalize_all(sinks)?;
    Ok(exit)
}

pub fn initialize_all(sinks: &mut [Box<dyn Sink>]) -> Result<()> {
    for sink in sinks.iter_mut() {
        sink.initialize()
            .map_err(|e| LoggerError::sink_failure(sink.name(), "initialize", e))?;
    }
    Ok(())
}

/// Deliver one message to every sink, in order
pub fn dispatch(sinks: &mut [Box<dyn Sink>], message: &LogMessage) -> Result<()> {
    for sink in sinks.iter_mut() {
        sink.deliver(message)
            .map_err(|e| LoggerError::sink_failure(sink.name(), "deliver", e))?;
    }
    Ok(())
}

pub fn finalize_all(sinks: &mut [Box<dyn Sink>]) -> Result<()> {
    for sink in sinks.iter_mut() {
        sink.finalize()
            .map_err(|e| LoggerError::sink_failure(sink.name(), "finalize", e))?;
    }
    Ok(())
}

/// Receiving half of a delivery queue, as seen by an async worker
#[async_trait]
pub trait AsyncReceive: Send {
    /// Wait until an item is available or the receive is cancelled
    async fn receive(&mut self) -> Result<Received>;
}

/// Run the async worker loop until shutdown or cancellation.
///
/// Cancellation is only observed while waiting for the next item, never in the
/// middle of a dispatch, and it is followed by the usual finalize sequence.
pub async fn run_async_worker<R>(
    receiver: &mut R,
    sinks: &mut [Box<dyn AsyncSink>],
) -> Result<WorkerExit>
where
    R: AsyncReceive + ?Sized,
{
    initialize_all_async(sinks).await?;

    let exit = loop {
        match receiver.receive().await? {
            Received::Item(Envelope::Message(message)) => dispatch_async(sinks, &message).await?,
            Received::Item(Envelope::Shutdown) => break WorkerExit::Shutdown,
            Received::Cancelled => break WorkerExit::Cancelled,
        }
    };

    finalize_all_async(sinks).await?;
    Ok(exit)
}

pub async fn initialize_all_async(sinks: &mut [Box<dyn AsyncSink>]) -> Result<()> {
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.initialize().await {
            return Err(LoggerError::sink_failure(sink.name(), "initialize", e));
        }
    }
    Ok(())
}

pub async fn dispatch_async(sinks: &mut [Box<dyn AsyncSink>], message: &LogMessage) -> Result<()> {
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.deliver(message).await {
            return Err(LoggerError::sink_failure(sink.name(), "deliver", e));
        }
    }
    Ok(())
}

pub async fn finalize_all_async(sinks: &mut [Box<dyn AsyncSink>]) -> Result<()> {
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.finalize().await {
            return Err(LoggerError::sink_failure(sink.name(), "finalize", e));
        }
    }
    Ok(())
}
