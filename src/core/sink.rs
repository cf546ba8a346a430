//! Sink trait for log output destinations

use super::{error::Result, log_message::LogMessage};

/// A blocking output target owned by a worker.
///
/// `initialize` runs once before the first `deliver`, on the same thread or
/// process that calls `deliver`; `finalize` runs once after the last one.
/// Sinks re-check their own threshold in `deliver`.
pub trait Sink: Send {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn deliver(&mut self, message: &LogMessage) -> Result<()>;

    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
