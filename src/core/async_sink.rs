//! Async sink trait for the cooperative task worker

use super::{error::Result, log_message::LogMessage};
use async_trait::async_trait;

/// Trait for asynchronous log sinks
///
/// # Example
///
/// ```no_run
/// use leveled_logger::core::{AsyncSink, LogMessage, Result};
/// use async_trait::async_trait;
///
/// struct MyAsyncSink;
///
/// #[async_trait]
/// impl AsyncSink for MyAsyncSink {
///     async fn deliver(&mut self, message: &LogMessage) -> Result<()> {
///         // Async write logic
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "my_async_sink"
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncSink: Send {
    /// Acquire the output resource inside the worker task
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write one message, fully draining before returning
    async fn deliver(&mut self, message: &LogMessage) -> Result<()>;

    /// Flush and release the output resource
    async fn finalize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get the sink name
    fn name(&self) -> &str;
}
