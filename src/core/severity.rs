//! Severity definitions
//!
//! Ranks run the opposite way from most logging frameworks: `Other` (rank 0) is
//! the least filtered and `Debug` (rank 4) the most filtered. A message passes a
//! threshold when its rank is less than or equal to the threshold's rank.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Severity {
    Other = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    #[default]
    Debug = 4,
}

impl Severity {
    /// All severities in rank order
    pub const ALL: [Severity; 5] = [
        Severity::Other,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Debug,
    ];

    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Other => "OTHER",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Debug => "DEBUG",
        }
    }

    /// Whether a message of this severity is accepted by `threshold`
    #[inline]
    pub fn passes(self, threshold: Severity) -> bool {
        passes(self, threshold)
    }
}

/// Filtering predicate shared by loggers and sinks
#[inline]
pub fn passes(severity: Severity, threshold: Severity) -> bool {
    severity.rank() <= threshold.rank()
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OTHER" => Ok(Severity::Other),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "DEBUG" => Ok(Severity::Debug),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(rank: u8) -> Result<Self, String> {
        Severity::ALL
            .get(usize::from(rank))
            .copied()
            .ok_or_else(|| format!("Invalid severity rank: {}", rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_follow_declaration_order() {
        let ranks: Vec<u8> = Severity::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_passes_against_warning_threshold() {
        let threshold = Severity::Warning;
        assert!(Severity::Other.passes(threshold));
        assert!(Severity::Info.passes(threshold));
        assert!(Severity::Warning.passes(threshold));
        assert!(!Severity::Error.passes(threshold));
        assert!(!Severity::Debug.passes(threshold));
    }

    #[test]
    fn test_debug_threshold_accepts_everything() {
        for severity in Severity::ALL {
            assert!(passes(severity, Severity::Debug));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("Other".parse::<Severity>(), Ok(Severity::Other));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_try_from_rank() {
        assert_eq!(Severity::try_from(3), Ok(Severity::Error));
        assert_eq!(
            Severity::try_from(5),
            Err("Invalid severity rank: 5".to_string())
        );
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
        let parsed: Severity = serde_json::from_str("\"DEBUG\"").unwrap();
        assert_eq!(parsed, Severity::Debug);
    }
}
