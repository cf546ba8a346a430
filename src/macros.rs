//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They work with any
//! logger exposing `log(severity, text)`, and evaluate to its `Result`.
//!
//! # Examples
//!
//! ```
//! use leveled_logger::prelude::*;
//! use leveled_logger::info;
//!
//! let logger = SyncLogger::synchronous("server", Severity::Debug, vec![Box::new(MemorySink::new())]);
//! logger.start()?;
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = SyncLogger::synchronous("app", Severity::Debug, vec![Box::new(MemorySink::new())]);
/// # logger.start().unwrap();
/// use leveled_logger::log;
/// log!(logger, Severity::Info, "Simple message").unwrap();
/// log!(logger, Severity::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Log an OTHER-severity message.
#[macro_export]
macro_rules! other {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Other, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = SyncLogger::synchronous("app", Severity::Debug, vec![Box::new(MemorySink::new())]);
/// # logger.start().unwrap();
/// use leveled_logger::warning;
/// warning!(logger, "Retry {} of {}", 1, 3).unwrap();
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}
