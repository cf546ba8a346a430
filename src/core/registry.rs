//! Named logger instances
//!
//! The registry is an ordinary value: create one at program start and pass it
//! (or an `Arc` of it) to the code that needs named loggers.

use super::{logger::ThreadLogger, severity::Severity, sink::Sink};
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, Arc<ThreadLogger>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the logger registered under `name`, creating it on first use.
    ///
    /// A new logger gets `threshold` (default `Debug`) and `sinks` (default: one
    /// [`ConsoleSink`]). Once a name is registered, later calls return the same
    /// instance and their `threshold` and `sinks` are ignored. The returned
    /// logger is not started.
    pub fn get_logger(
        &self,
        name: &str,
        threshold: Option<Severity>,
        sinks: Option<Vec<Box<dyn Sink>>>,
    ) -> Arc<ThreadLogger> {
        let mut loggers = self.loggers.lock();
        let logger = loggers.entry(name.to_string()).or_insert_with(|| {
            let sinks = sinks.unwrap_or_else(|| {
                let console: Box<dyn Sink> = Box::new(ConsoleSink::new());
                vec![console]
            });
            Arc::new(ThreadLogger::threaded(
                name,
                threshold.unwrap_or_default(),
                sinks,
            ))
        });
        Arc::clone(logger)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.lock().is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }
}
