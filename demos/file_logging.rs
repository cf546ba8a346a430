//! File logging example
//!
//! Demonstrates a worker thread writing to console and file sinks simultaneously.
//!
//! Run with: cargo run --example file_logging

use leveled_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Leveled Logger - File Logging Example ===\n");

    let logger = LoggerBuilder::new("app")
        .sink(ConsoleSink::new())
        .sink(FileSink::new("application.log").with_threshold(Severity::Warning))
        .build_threaded();
    logger.start()?;

    println!("1. Logging to both console and file:");

    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    logger.info("Configuration loaded successfully")?;
    logger.warning("Using default settings for some options")?;
    logger.info("Connecting to database...")?;
    logger.error("Failed to load optional plugin")?;
    logger.info("Application initialization complete")?;

    println!("\n2. Performing some operations:");

    for i in 1..=5 {
        logger.info(format!("Processing item {}/5", i))?;
        if i == 3 {
            logger.warning("Item 3 took longer than expected")?;
        }
    }

    logger.info("All operations completed")?;

    // Drains the queue and finalizes both sinks
    logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false)?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the OTHER, INFO and WARNING lines");

    Ok(())
}
