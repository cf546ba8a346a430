//! Line formatting shared by the console-style sinks
//!
//! A formatted line looks like `<ISO timestamp> <SEVERITY>: <text>\n`. When a
//! [`ColorMap`] is supplied, the whole line (newline included) is wrapped in the
//! severity's ANSI style and terminated with a reset.

use super::{log_message::LogMessage, severity::Severity};
use colored::{Color, Colorize};

/// Terminal style for one severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: Color,
    pub bold: bool,
}

impl Style {
    pub const fn new(color: Color, bold: bool) -> Self {
        Self { color, bold }
    }
}

/// Severity to terminal style mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    styles: [Style; 5],
}

impl ColorMap {
    #[must_use]
    pub fn with_style(mut self, severity: Severity, color: Color, bold: bool) -> Self {
        self.styles[usize::from(severity.rank())] = Style::new(color, bold);
        self
    }

    pub fn style(&self, severity: Severity) -> Style {
        self.styles[usize::from(severity.rank())]
    }

    /// Wrap `text` in the style registered for `severity`
    pub fn paint(&self, severity: Severity, text: &str) -> String {
        let style = self.style(severity);
        let painted = text.color(style.color);
        if style.bold {
            painted.bold().to_string()
        } else {
            painted.to_string()
        }
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            styles: [
                Style::new(Color::BrightYellow, false),
                Style::new(Color::Green, false),
                Style::new(Color::Blue, false),
                Style::new(Color::Red, true),
                Style::new(Color::Cyan, false),
            ],
        }
    }
}

/// Format one message as a newline-terminated line
pub fn format_line(message: &LogMessage, colors: Option<&ColorMap>) -> String {
    let line = format!(
        "{} {}: {}\n",
        message.iso_timestamp(),
        message.severity(),
        message.text()
    );

    match colors {
        Some(map) => map.paint(message.severity(), &line),
        None => line,
    }
}
