//! Property-based tests for leveled_logger using proptest

use leveled_logger::core::{format_line, Envelope};
use leveled_logger::prelude::*;
use proptest::prelude::*;

fn any_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Other),
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
        Just(Severity::Debug),
    ]
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Filtering is exactly rank comparison
    #[test]
    fn test_passes_matches_rank(severity in any_severity(), threshold in any_severity()) {
        prop_assert_eq!(severity.passes(threshold), severity.rank() <= threshold.rank());
    }

    /// Test that Severity string conversions roundtrip correctly
    #[test]
    fn test_severity_str_roundtrip(severity in any_severity(), use_lower in any::<bool>()) {
        let name = if use_lower {
            severity.name().to_lowercase()
        } else {
            severity.name().to_string()
        };
        let parsed: Severity = name.parse().unwrap();
        prop_assert_eq!(parsed, severity);
    }

    /// Test that rank conversion is total over the valid range and rejects the rest
    #[test]
    fn test_rank_conversion(rank in any::<u8>()) {
        match Severity::try_from(rank) {
            Ok(severity) => prop_assert_eq!(severity.rank(), rank),
            Err(_) => prop_assert!(rank > 4),
        }
    }
}

// ============================================================================
// Message and Wire Tests
// ============================================================================

proptest! {
    /// Arbitrary text survives the queue wire format unchanged
    #[test]
    fn test_envelope_json_preserves_text(text in ".*", severity in any_severity()) {
        let envelope = Envelope::Message(LogMessage::new(severity, text.clone()));
        let json = serde_json::to_string(&envelope).unwrap();
        prop_assert!(!json.contains('\n'));

        let parsed: Envelope = serde_json::from_str(&json).unwrap();
        match parsed {
            Envelope::Message(message) => {
                prop_assert_eq!(message.text(), text.as_str());
                prop_assert_eq!(message.severity(), severity);
            }
            Envelope::Shutdown => prop_assert!(false, "expected a message"),
        }
    }

    /// Plain lines are `<timestamp> <NAME>: <text>\n`
    #[test]
    fn test_plain_line_shape(text in "[^\n]*", severity in any_severity()) {
        let message = LogMessage::new(severity, text.clone());
        let line = format_line(&message, None);
        prop_assert_eq!(
            line,
            format!("{} {}: {}\n", message.iso_timestamp(), severity.name(), text)
        );
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Sinks receive exactly the passing messages, in submission order
    #[test]
    fn test_threaded_delivery_is_filtered_fifo(
        threshold in any_severity(),
        batch in prop::collection::vec((any_severity(), "[a-z]{0,8}"), 0..40),
    ) {
        let sink = MemorySink::new();
        let handle = sink.handle();
        let logger = ThreadLogger::threaded("prop", threshold, vec![Box::new(sink)]);
        logger.start().unwrap();

        for (severity, text) in &batch {
            logger.log(*severity, text.clone()).unwrap();
        }
        logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).unwrap();

        let expected: Vec<String> = batch
            .iter()
            .filter(|(severity, _)| severity.passes(threshold))
            .map(|(_, text)| text.clone())
            .collect();
        prop_assert_eq!(handle.texts(), expected);
        prop_assert_eq!(handle.initialize_count(), 1);
        prop_assert_eq!(handle.finalize_count(), 1);
    }

    /// The synchronous logger sees the same stream as the threaded one
    #[test]
    fn test_synchronous_delivery_is_filtered_fifo(
        threshold in any_severity(),
        batch in prop::collection::vec(any_severity(), 0..40),
    ) {
        let sink = MemorySink::new();
        let handle = sink.handle();
        let logger = SyncLogger::synchronous("prop", threshold, vec![Box::new(sink)]);
        logger.start().unwrap();

        for (i, severity) in batch.iter().enumerate() {
            logger.log(*severity, i.to_string()).unwrap();
        }
        logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).unwrap();

        let delivered: Vec<Severity> = handle.messages().iter().map(|m| m.severity()).collect();
        let expected: Vec<Severity> = batch.into_iter().filter(|s| s.passes(threshold)).collect();
        prop_assert_eq!(delivered, expected);
    }
}
