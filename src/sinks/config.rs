//! Serializable sink descriptions
//!
//! A worker process cannot receive boxed sinks from its parent, so it rebuilds
//! them from these descriptions.

use super::{ConsoleSink, FileSink, NetworkSink};
use crate::core::{Result, Severity, Sink};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    Console {
        #[serde(default)]
        threshold: Severity,
        #[serde(default = "default_colors")]
        colors: bool,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        threshold: Severity,
    },
    Network {
        address: String,
        #[serde(default)]
        threshold: Severity,
    },
}

fn default_colors() -> bool {
    true
}

impl SinkConfig {
    pub fn console(threshold: Severity, colors: bool) -> Self {
        SinkConfig::Console { threshold, colors }
    }

    pub fn file(path: impl AsRef<Path>, threshold: Severity) -> Self {
        SinkConfig::File {
            path: path.as_ref().to_path_buf(),
            threshold,
        }
    }

    pub fn network(address: impl Into<String>, threshold: Severity) -> Self {
        SinkConfig::Network {
            address: address.into(),
            threshold,
        }
    }

    /// Build the described sink. Nothing is opened or connected until the
    /// worker initializes it.
    pub fn build(&self) -> Result<Box<dyn Sink>> {
        let sink: Box<dyn Sink> = match self {
            SinkConfig::Console { threshold, colors } => Box::new(
                ConsoleSink::new()
                    .with_threshold(*threshold)
                    .with_colors(*colors),
            ),
            SinkConfig::File { path, threshold } => {
                Box::new(FileSink::new(path.clone()).with_threshold(*threshold))
            }
            SinkConfig::Network { address, threshold } => {
                Box::new(NetworkSink::new(address.clone()).with_threshold(*threshold))
            }
        };
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let config = SinkConfig::file("/var/log/app.log", Severity::Warning);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "file",
                "path": "/var/log/app.log",
                "threshold": "WARNING",
            })
        );
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: SinkConfig = serde_json::from_str(r#"{"type":"console"}"#).unwrap();
        assert_eq!(config, SinkConfig::console(Severity::Debug, true));
    }

    #[test]
    fn test_build_names() {
        let configs = [
            SinkConfig::console(Severity::Info, false),
            SinkConfig::file("app.log", Severity::Error),
            SinkConfig::network("127.0.0.1:9000", Severity::Debug),
        ];
        let names: Vec<String> = configs
            .iter()
            .map(|c| c.build().unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["console", "file", "network"]);
    }
}
