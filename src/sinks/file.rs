//! File sink implementation

use crate::core::{format_line, LogMessage, LoggerError, Result, Severity, Sink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends uncolored lines to a file.
///
/// The file is opened in `initialize` on the worker, so a file sink can be
/// configured in one process and written from another. With the `file` feature
/// the sink holds an exclusive advisory lock until `finalize`, so two workers
/// never interleave writes to the same file.
pub struct FileSink {
    path: PathBuf,
    threshold: Severity,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            threshold: Severity::Debug,
            writer: None,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn initialize(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation("creating log directory", parent.display().to_string(), e)
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", self.path.display().to_string(), e)
            })?;

        #[cfg(feature = "file")]
        fs2::FileExt::try_lock_exclusive(&file)
            .map_err(|_| LoggerError::file_lock(self.path.display().to_string()))?;

        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn deliver(&mut self, message: &LogMessage) -> Result<()> {
        if !message.severity().passes(self.threshold) {
            return Ok(());
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer.write_all(format_line(message, None).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            #[cfg(feature = "file")]
            fs2::FileExt::unlock(writer.get_ref())?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        if let Some(ref mut writer) = self.writer {
            let _ = writer.flush();
        }
    }
}
