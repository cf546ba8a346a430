//! Error types for the logger system

use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// `log()` or `stop()` called on a logger that is not running
    #[error("Logger '{name}' is not running")]
    NotRunning { name: String },

    /// `start()` called on a logger whose worker is already running
    #[error("Logger '{name}' is already running")]
    AlreadyRunning { name: String },

    /// Logger already stopped; a stopped logger cannot be restarted
    #[error("Logger '{name}' already stopped")]
    AlreadyStopped { name: String },

    /// The worker did not finish draining within the caller's deadline
    #[error("Logger '{name}' worker did not stop within {timeout:?}")]
    ShutdownTimeout { name: String, timeout: Duration },

    /// A sink failed during one of its lifecycle operations
    #[error("Sink '{sink}' failed during {operation}: {source}")]
    SinkFailure {
        sink: String,
        operation: &'static str,
        #[source]
        source: Box<LoggerError>,
    },

    /// The worker ended with an error, a panic or a failing exit status
    #[error("Logger '{name}' worker failed: {reason}")]
    WorkerFailed { name: String, reason: String },

    /// Channel send error
    #[error("Failed to send log message to worker")]
    ChannelSendError,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// An async logger was started outside of a tokio runtime
    #[error("No async runtime available to spawn the worker task")]
    RuntimeUnavailable,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn not_running(name: impl Into<String>) -> Self {
        LoggerError::NotRunning { name: name.into() }
    }

    pub fn already_running(name: impl Into<String>) -> Self {
        LoggerError::AlreadyRunning { name: name.into() }
    }

    pub fn already_stopped(name: impl Into<String>) -> Self {
        LoggerError::AlreadyStopped { name: name.into() }
    }

    pub fn shutdown_timeout(name: impl Into<String>, timeout: Duration) -> Self {
        LoggerError::ShutdownTimeout {
            name: name.into(),
            timeout,
        }
    }

    /// Wrap an error raised by a sink with the sink name and the failing operation
    pub fn sink_failure(sink: impl Into<String>, operation: &'static str, source: LoggerError) -> Self {
        LoggerError::SinkFailure {
            sink: sink.into(),
            operation,
            source: Box::new(source),
        }
    }

    pub fn worker_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::WorkerFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
