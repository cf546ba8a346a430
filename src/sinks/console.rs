//! Console sink implementation

use crate::core::{format_line, ColorMap, LogMessage, Result, Severity, Sink};
use std::io::{self, Stdout, Write};

/// Writes colored lines to stdout, or to any writer given to [`ConsoleSink::with_writer`]
pub struct ConsoleSink<W: Write + Send = Stdout> {
    threshold: Severity,
    colors: Option<ColorMap>,
    writer: W,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            threshold: Severity::Debug,
            colors: Some(ColorMap::default()),
            writer,
        }
    }

    /// Only deliver messages passing `threshold`, independently of the logger's own
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

    /// Replace the severity to color mapping
    ///
    /// # Example
    ///
    /// ```
    /// use leveled_logger::sinks::ConsoleSink;
    /// use leveled_logger::core::{ColorMap, Severity};
    /// use colored::Color;
    ///
    /// let sink = ConsoleSink::new()
    ///     .with_color_map(ColorMap::default().with_style(Severity::Debug, Color::Magenta, false));
    /// ```
    #[must_use]
    pub fn with_color_map(mut self, colors: ColorMap) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn deliver(&mut self, message: &LogMessage) -> Result<()> {
        if !message.severity().passes(self.threshold) {
            return Ok(());
        }

        let line = format_line(message, self.colors.as_ref());
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
