//! Synchronous substrate: sinks run in the caller's thread
//!
//! There is no queue and no worker. `spawn` initializes the sinks right away,
//! every `send` dispatches immediately, and the shutdown signal finalizes them.

use crate::core::{
    worker::{dispatch, finalize_all, initialize_all},
    Envelope, Logger, LoggerError, Result, Severity, Sink, Spawner, Transport, WorkerHandle,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct InlineState {
    sinks: Vec<Box<dyn Sink>>,
    finished: bool,
    /// Why the finalize sequence failed, reported once by the join
    failure: Option<String>,
}

pub struct InlineSpawner {
    sinks: Option<Vec<Box<dyn Sink>>>,
}

impl InlineSpawner {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks: Some(sinks) }
    }
}

impl Spawner for InlineSpawner {
    type Transport = InlineTransport;
    type Handle = InlineHandle;

    fn spawn(&mut self, name: &str) -> Result<(InlineTransport, InlineHandle)> {
        let mut sinks = self
            .sinks
            .take()
            .ok_or_else(|| LoggerError::already_stopped(name))?;
        initialize_all(&mut sinks)?;

        let state = Arc::new(Mutex::new(InlineState {
            sinks,
            finished: false,
            failure: None,
        }));
        Ok((
            InlineTransport {
                state: Arc::clone(&state),
            },
            InlineHandle {
                name: name.to_string(),
                state,
            },
        ))
    }
}

pub struct InlineTransport {
    state: Arc<Mutex<InlineState>>,
}

impl Transport for InlineTransport {
    fn send(&self, envelope: Envelope) -> Result<()> {
        let mut state = self.state.lock();
        if state.finished {
            return Err(LoggerError::ChannelSendError);
        }

        match envelope {
            Envelope::Message(message) => dispatch(&mut state.sinks, &message),
            Envelope::Shutdown => {
                state.finished = true;
                finalize_all(&mut state.sinks).map_err(|e| {
                    state.failure = Some(e.to_string());
                    e
                })
            }
        }
    }
}

pub struct InlineHandle {
    name: String,
    state: Arc<Mutex<InlineState>>,
}

impl WorkerHandle for InlineHandle {
    fn is_alive(&self) -> bool {
        !self.state.lock().finished
    }

    fn join_timeout(&mut self, _timeout: Duration) -> Result<bool> {
        // Shutdown already ran the finalize sequence synchronously
        match self.state.lock().failure.take() {
            Some(reason) => Err(LoggerError::worker_failed(&self.name, reason)),
            None => Ok(true),
        }
    }

    fn terminate(&mut self) -> Result<()> {
        self.state.lock().finished = true;
        Ok(())
    }
}

impl Logger<InlineSpawner> {
    /// Create a logger whose sinks run in the calling thread
    #[must_use]
    pub fn synchronous(
        name: impl Into<String>,
        threshold: Severity,
        sinks: Vec<Box<dyn Sink>>,
    ) -> Self {
        Self::with_spawner(name, threshold, InlineSpawner::new(sinks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogMessage, SyncLogger, DEFAULT_SHUTDOWN_TIMEOUT};
    use crate::sinks::MemorySink;

    #[test]
    fn test_initializes_on_start_in_caller_thread() {
        let sink = MemorySink::new();
        let handle = sink.handle();
        let logger = SyncLogger::synchronous("inline", Severity::Debug, vec![Box::new(sink)]);

        assert_eq!(handle.initialize_count(), 0);
        logger.start().unwrap();
        assert_eq!(handle.initialize_count(), 1);

        logger.info("immediate").unwrap();
        // Delivered before log() returned
        assert_eq!(handle.texts(), vec!["immediate"]);

        logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, true).unwrap();
        assert_eq!(handle.finalize_count(), 1);
    }

    #[test]
    fn test_sink_error_reaches_caller() {
        struct Broken;

        impl Sink for Broken {
            fn deliver(&mut self, _message: &LogMessage) -> Result<()> {
                Err(LoggerError::writer("device gone"))
            }

            fn name(&self) -> &str {
                "broken"
            }
        }

        let logger = SyncLogger::synchronous("inline", Severity::Debug, vec![Box::new(Broken)]);
        logger.start().unwrap();

        let err = logger.error("boom").unwrap_err();
        assert!(matches!(err, LoggerError::SinkFailure { .. }));
    }

    #[test]
    fn test_send_after_shutdown_is_rejected() {
        let mut spawner = InlineSpawner::new(vec![Box::new(MemorySink::new())]);
        let (transport, handle) = spawner.spawn("inline").unwrap();

        transport.send(Envelope::Shutdown).unwrap();
        assert!(!handle.is_alive());
        assert!(transport
            .send(Envelope::Message(LogMessage::new(Severity::Info, "late")))
            .is_err());
        assert!(spawner.spawn("inline").is_err());
    }

    #[test]
    fn test_finalize_failure_fails_stop() {
        struct Unflushable;

        impl Sink for Unflushable {
            fn deliver(&mut self, _message: &LogMessage) -> Result<()> {
                Ok(())
            }

            fn finalize(&mut self) -> Result<()> {
                Err(LoggerError::writer("flush rejected"))
            }

            fn name(&self) -> &str {
                "unflushable"
            }
        }

        let logger =
            SyncLogger::synchronous("inline", Severity::Debug, vec![Box::new(Unflushable)]);
        logger.start().unwrap();
        logger.info("accepted").unwrap();

        let err = logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, true).unwrap_err();
        match err {
            LoggerError::WorkerFailed { reason, .. } => {
                assert!(reason.contains("finalize"), "{}", reason);
                assert!(reason.contains("unflushable"), "{}", reason);
            }
            other => panic!("expected WorkerFailed, got {:?}", other),
        }
        assert!(logger.is_stopped());
    }

    #[test]
    fn test_is_running_while_a_caller_is_delivering() {
        use crossbeam_channel::{bounded, Receiver, Sender};
        use std::thread;

        struct Gate {
            entered: Sender<()>,
            release: Receiver<()>,
        }

        impl Sink for Gate {
            fn deliver(&mut self, _message: &LogMessage) -> Result<()> {
                let _ = self.entered.send(());
                let _ = self.release.recv();
                Ok(())
            }

            fn name(&self) -> &str {
                "gate"
            }
        }

        let (entered_tx, entered_rx) = bounded(1);
        let (release_tx, release_rx) = bounded(1);
        let gate = Gate {
            entered: entered_tx,
            release: release_rx,
        };
        let logger = Arc::new(SyncLogger::synchronous(
            "inline",
            Severity::Debug,
            vec![Box::new(gate)],
        ));
        logger.start().unwrap();

        let producer = {
            let logger = Arc::clone(&logger);
            thread::spawn(move || logger.info("held"))
        };
        entered_rx.recv().unwrap();

        // The producer is parked inside deliver with the lifecycle read-locked
        let (status_tx, status_rx) = bounded(1);
        {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let _ = status_tx.send(logger.is_running());
            });
        }
        let running = status_rx.recv_timeout(Duration::from_secs(5));

        release_tx.send(()).unwrap();
        producer.join().unwrap().unwrap();
        assert_eq!(running, Ok(true));

        logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, true).unwrap();
    }
}
