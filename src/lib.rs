//! # Leveled Logger
//!
//! A leveled logger whose producers never depend on how messages reach their
//! sinks. The same facade runs on several substrates:
//!
//! - **Synchronous**: sinks are called in the caller's thread
//! - **Worker thread**: a dedicated thread drains an unbounded queue
//! - **Worker process**: a child process reads the queue from its stdin
//! - **Async task**: a tokio task drains the queue (feature `async-worker`)
//!
//! Messages pass when their severity rank is at most the logger's threshold,
//! with ranks `OTHER < INFO < WARNING < ERROR < DEBUG`.
//!
//! ```
//! use leveled_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let handle = sink.handle();
//!
//! let logger = LoggerBuilder::new("app")
//!     .threshold(Severity::Warning)
//!     .sink(sink)
//!     .build_threaded();
//!
//! logger.start()?;
//! logger.warning("disk almost full")?;
//! logger.debug("dropped by the threshold")?;
//! logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false)?;
//!
//! assert_eq!(handle.texts(), vec!["disk almost full"]);
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod runtime;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        AsyncSink, ColorMap, LogMessage, Logger, LoggerBuilder, LoggerError, LoggerRegistry,
        Result, Severity, Sink, SyncLogger, ThreadLogger, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::runtime::{ProcessLogger, ProcessSpawner};
    pub use crate::sinks::{
        ConsoleSink, FileSink, MemoryHandle, MemorySink, NetworkSink, SinkConfig,
    };

    #[cfg(feature = "async-worker")]
    pub use crate::runtime::AsyncLogger;
    #[cfg(feature = "async-worker")]
    pub use crate::sinks::{AsyncConsoleSink, AsyncFileSink};
}

pub use crate::core::{
    AsyncSink, LogMessage, Logger, LoggerBuilder, LoggerError, LoggerRegistry, Result, Severity,
    Sink, SyncLogger, ThreadLogger, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::runtime::{ProcessLogger, ProcessSpawner};
pub use crate::sinks::{ConsoleSink, FileSink, MemorySink, NetworkSink, SinkConfig};

#[cfg(feature = "async-worker")]
pub use crate::runtime::AsyncLogger;
