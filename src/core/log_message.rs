//! Log message structure

use super::severity::Severity;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// ISO 8601 with microseconds and the local UTC offset
pub const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// A timestamped, severity-tagged message.
///
/// Built once per accepted `log` call; sinks only ever see it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    timestamp: DateTime<Local>,
    severity: Severity,
    text: String,
}

impl LogMessage {
    /// Create a message stamped with the current local time
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self::at(Local::now(), severity, text)
    }

    pub fn at(timestamp: DateTime<Local>, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            severity,
            text: text.into(),
        }
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn iso_timestamp(&self) -> String {
        self.timestamp.format(ISO_TIMESTAMP_FORMAT).to_string()
    }
}
