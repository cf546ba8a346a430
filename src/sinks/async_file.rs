//! Async file sink for non-blocking log file writing
//!
//! Uses tokio::fs for fully asynchronous file I/O

use crate::core::{format_line, AsyncSink, LogMessage, LoggerError, Result, Severity};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Appends uncolored lines to a file from the task worker
///
/// The file is opened in `initialize` and every delivered line is flushed
/// before `deliver` returns, so nothing is lost when the task is cancelled
/// between messages.
///
/// # Example
///
/// ```no_run
/// use leveled_logger::prelude::*;
/// use leveled_logger::sinks::AsyncFileSink;
///
/// # async fn example() -> leveled_logger::Result<()> {
/// let sinks: Vec<Box<dyn AsyncSink>> = vec![Box::new(AsyncFileSink::new("app.log"))];
/// let logger = AsyncLogger::new("app", Severity::Info, sinks);
/// logger.start()?;
/// logger.info("Hello async world!")?;
/// logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).await?;
/// # Ok(())
/// # }
/// ```
pub struct AsyncFileSink {
    path: PathBuf,
    threshold: Severity,
    buffer_size: usize,
    writer: Option<BufWriter<File>>,
}

impl AsyncFileSink {
    /// Default buffer size (64 KB)
    pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            threshold: Severity::Debug,
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
            writer: None,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

#[async_trait]
impl AsyncSink for AsyncFileSink {
    async fn initialize(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                LoggerError::io_operation("creating log directory", parent.display().to_string(), e)
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                LoggerError::io_operation("opening log file", self.path.display().to_string(), e)
            })?;

        self.writer = Some(BufWriter::with_capacity(self.buffer_size, file));
        Ok(())
    }

    async fn deliver(&mut self, message: &LogMessage) -> Result<()> {
        if !message.severity().passes(self.threshold) {
            return Ok(());
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer
            .write_all(format_line(message, None).as_bytes())
            .await?;
        writer.flush().await?;
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            writer.get_mut().sync_all().await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "async_file"
    }
}
