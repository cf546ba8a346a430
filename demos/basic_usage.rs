//! Basic logger usage example
//!
//! Demonstrates synchronous logging to the console and how the threshold
//! filters severities.
//!
//! Run with: cargo run --example basic_usage

use leveled_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Leveled Logger - Basic Usage Example ===\n");

    // Sinks run in the calling thread
    let logger = LoggerBuilder::new("basic")
        .sink(ConsoleSink::new())
        .build_synchronous();
    logger.start()?;

    println!("1. Logging at every severity (threshold DEBUG passes all):");
    logger.other("This is an other message")?;
    logger.info("This is an info message")?;
    logger.warning("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.debug("This is a debug message")?;
    logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false)?;

    println!("\n2. Threshold WARNING - error and debug won't show:");
    let quiet = LoggerBuilder::new("quiet")
        .threshold(Severity::Warning)
        .sink(ConsoleSink::new())
        .build_synchronous();
    quiet.start()?;
    quiet.info("Info message (visible)")?;
    quiet.warning("Warning message (visible)")?;
    quiet.error("Error message (hidden)")?;
    quiet.debug("Debug message (hidden)")?;
    quiet.stop(DEFAULT_SHUTDOWN_TIMEOUT, false)?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
