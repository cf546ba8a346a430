//! Async logging example
//!
//! Demonstrates the tokio task worker shared by many producer tasks.
//!
//! Run with: cargo run --example async_logging

use leveled_logger::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Leveled Logger - Async Logging Example ===\n");

    let sinks: Vec<Box<dyn AsyncSink>> = vec![
        Box::new(AsyncConsoleSink::new()),
        Box::new(AsyncFileSink::new("async_test.log")),
    ];
    let logger = Arc::new(AsyncLogger::new("async", Severity::Debug, sinks));
    logger.start()?;

    println!("1. Queueing from the main task:");
    for i in 0..10 {
        logger.info(format!("Message #{}", i))?;
    }

    println!("\n2. Queueing from several tasks:");
    let mut tasks = Vec::new();
    for task_id in 0..5 {
        let logger = Arc::clone(&logger);
        tasks.push(tokio::spawn(async move {
            for i in 0..5 {
                logger.debug(format!("Task {} - Message {}", task_id, i))?;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Ok::<(), LoggerError>(())
        }));
    }

    for task in tasks {
        task.await
            .map_err(|e| LoggerError::other(e.to_string()))??;
    }

    logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).await?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'async_test.log' for file output");

    Ok(())
}
