//! In-memory sink recording everything it receives

use crate::core::{AsyncSink, LogMessage, Result, Severity, Sink};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Record {
    messages: Vec<LogMessage>,
    initialized: usize,
    finalized: usize,
}

/// Shared view of what a [`MemorySink`] has received.
///
/// Stays readable after the sink itself moved into a worker.
#[derive(Debug, Clone, Default)]
pub struct MemoryHandle {
    record: Arc<Mutex<Record>>,
}

impl MemoryHandle {
    pub fn messages(&self) -> Vec<LogMessage> {
        self.record.lock().messages.clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.record
            .lock()
            .messages
            .iter()
            .map(|m| m.text().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.record.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.lock().messages.is_empty()
    }

    pub fn initialize_count(&self) -> usize {
        self.record.lock().initialized
    }

    pub fn finalize_count(&self) -> usize {
        self.record.lock().finalized
    }
}

/// Sink keeping delivered messages in memory; works with every substrate
/// except the worker process.
#[derive(Debug, Default)]
pub struct MemorySink {
    threshold: Severity,
    handle: MemoryHandle,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn handle(&self) -> MemoryHandle {
        self.handle.clone()
    }

    fn record(&self, message: &LogMessage) {
        if message.severity().passes(self.threshold) {
            self.handle.record.lock().messages.push(message.clone());
        }
    }
}

impl Sink for MemorySink {
    fn initialize(&mut self) -> Result<()> {
        self.handle.record.lock().initialized += 1;
        Ok(())
    }

    fn deliver(&mut self, message: &LogMessage) -> Result<()> {
        self.record(message);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.handle.record.lock().finalized += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl AsyncSink for MemorySink {
    async fn initialize(&mut self) -> Result<()> {
        Sink::initialize(self)
    }

    async fn deliver(&mut self, message: &LogMessage) -> Result<()> {
        self.record(message);
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        Sink::finalize(self)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
