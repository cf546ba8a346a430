//! Worker process example
//!
//! The example re-launches itself as the logging worker: sinks live in the
//! child process and messages travel over its stdin.
//!
//! Run with: cargo run --example process_logging

use leveled_logger::prelude::*;
use leveled_logger::runtime::process::run_worker_if_requested;
use std::time::Duration;

fn main() -> Result<()> {
    // In the child, act as the worker and exit
    if run_worker_if_requested()? {
        return Ok(());
    }

    println!("=== Leveled Logger - Worker Process Example ===\n");

    let spawner = ProcessSpawner::current_exe(vec![
        SinkConfig::console(Severity::Debug, true),
        SinkConfig::file("process.log", Severity::Info),
    ])?;
    let logger = ProcessLogger::process("isolated", Severity::Debug, spawner);
    logger.start()?;

    logger.other("Worker process started")?;
    logger.info("Sinks were rebuilt in the child")?;
    logger.warning("Messages cross a pipe as JSON lines")?;
    logger.error("A crash in a sink cannot take this process down")?;
    logger.debug("Only on the console: the file sink stops at INFO")?;

    logger.stop(Duration::from_secs(5), false)?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'process.log' for file output");

    Ok(())
}
