//! Console sink for the cooperative task worker
//!
//! Output goes through a [`DrainWriter`]: `write` only buffers, `drain` awaits
//! until the buffered bytes reached the stream. Platforms without an awaitable
//! stdout use [`OffloadedStdout`], which drains on the blocking thread pool.

use crate::core::{format_line, AsyncSink, ColorMap, LogMessage, LoggerError, Result, Severity};
use async_trait::async_trait;
use std::io::Write as _;
use tokio::io::AsyncWriteExt;

/// Buffered byte sink with an awaitable drain
#[async_trait]
pub trait DrainWriter: Send {
    /// Acquire the underlying stream
    async fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// Queue bytes without blocking
    fn write(&mut self, bytes: &[u8]);

    /// Wait until everything queued so far has been written out
    async fn drain(&mut self) -> Result<()>;
}

/// Stdout through tokio's async stream
#[derive(Default)]
pub struct StreamStdout {
    stdout: Option<tokio::io::Stdout>,
    pending: Vec<u8>,
}

#[async_trait]
impl DrainWriter for StreamStdout {
    async fn open(&mut self) -> Result<()> {
        self.stdout = Some(tokio::io::stdout());
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    async fn drain(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let stdout = self.stdout.get_or_insert_with(tokio::io::stdout);
        stdout.write_all(&self.pending).await?;
        stdout.flush().await?;
        self.pending.clear();
        Ok(())
    }
}

/// Stdout written by a blocking-pool thread, keeping the worker task responsive
#[derive(Default)]
pub struct OffloadedStdout {
    pending: Vec<u8>,
}

#[async_trait]
impl DrainWriter for OffloadedStdout {
    fn write(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    async fn drain(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::take(&mut self.pending);
        tokio::task::spawn_blocking(move || {
            let mut out = std::io::stdout().lock();
            out.write_all(&chunk)?;
            out.flush()
        })
        .await
        .map_err(|e| LoggerError::writer(format!("stdout drain task failed: {}", e)))??;
        Ok(())
    }
}

#[cfg(windows)]
pub type DefaultConsoleWriter = OffloadedStdout;

#[cfg(not(windows))]
pub type DefaultConsoleWriter = StreamStdout;

/// Colored console output for [`AsyncLogger`](crate::runtime::AsyncLogger)
pub struct AsyncConsoleSink<W: DrainWriter = DefaultConsoleWriter> {
    threshold: Severity,
    colors: Option<ColorMap>,
    writer: W,
}

impl AsyncConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(DefaultConsoleWriter::default())
    }
}

impl Default for AsyncConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: DrainWriter> AsyncConsoleSink<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            threshold: Severity::Debug,
            colors: Some(ColorMap::default()),
            writer,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.colors = use_colors.then(ColorMap::default);
        self
    }

    #[must_use]
    pub fn with_color_map(mut self, colors: ColorMap) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

#[async_trait]
impl<W: DrainWriter> AsyncSink for AsyncConsoleSink<W> {
    async fn initialize(&mut self) -> Result<()> {
        self.writer.open().await
    }

    async fn deliver(&mut self, message: &LogMessage) -> Result<()> {
        if !message.severity().passes(self.threshold) {
            return Ok(());
        }

        let line = format_line(message, self.colors.as_ref());
        self.writer.write(line.as_bytes());
        self.writer.drain().await
    }

    async fn finalize(&mut self) -> Result<()> {
        self.writer.drain().await
    }

    fn name(&self) -> &str {
        "async_console"
    }
}
