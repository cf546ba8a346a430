//! Core logger types and traits

pub mod async_sink;
pub mod envelope;
pub mod error;
pub mod format;
pub mod log_message;
pub mod logger;
pub mod registry;
pub mod severity;
pub mod sink;
pub mod spawner;
pub mod worker;

pub use async_sink::AsyncSink;
pub use envelope::Envelope;
pub use error::{LoggerError, Result};
pub use format::{format_line, ColorMap};
pub use log_message::LogMessage;
pub use logger::{
    Logger, LoggerBuilder, LoggerCore, SyncLogger, ThreadLogger, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use registry::LoggerRegistry;
pub use severity::{passes, Severity};
pub use sink::Sink;
pub use spawner::{Spawner, Transport, WorkerHandle};
pub use worker::WorkerExit;
