//! Integration tests for the leveled logger
//!
//! These tests verify:
//! - Every substrate delivers in FIFO order and finalizes its sinks
//! - Threshold filtering across substrates
//! - The worker process rebuilds its sinks and drains its stdin
//! - Registry identity
//! - Lifecycle errors are the same for every substrate

use leveled_logger::prelude::*;
use leveled_logger::runtime::process::WORKER_CONFIG_ENV;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn worker_exe() -> &'static str {
    env!("CARGO_BIN_EXE_leveled-logger-worker")
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_threaded_logger_writes_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("threaded.log");

    let logger = LoggerBuilder::new("threaded")
        .threshold(Severity::Info)
        .sink(FileSink::new(&log_file))
        .build_threaded();
    logger.start().expect("Failed to start");

    for i in 0..50 {
        logger.info(format!("Message {}", i)).unwrap();
        logger.debug(format!("Hidden {}", i)).unwrap();
    }
    logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).expect("Failed to stop");

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 50, "Should have 50 log entries");
    for (i, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!("INFO: Message {}", i)), "line {}: {}", i, line);
    }
}

#[test]
fn test_synchronous_logger_writes_before_returning() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("sync.log");

    let logger = LoggerBuilder::new("sync")
        .sink(FileSink::new(&log_file))
        .build_synchronous();
    logger.start().unwrap();

    logger.error("written immediately").unwrap();
    assert_eq!(read_lines(&log_file).len(), 1);

    logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).unwrap();
}

#[test]
fn test_process_logger_writes_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("process.log");

    let spawner = ProcessSpawner::new(
        worker_exe(),
        vec![SinkConfig::file(&log_file, Severity::Debug)],
    );
    let logger = ProcessLogger::process("proc", Severity::Warning, spawner);
    logger.start().expect("Failed to spawn worker");
    assert!(logger.is_running());

    logger.other("first").unwrap();
    logger.info("second").unwrap();
    logger.warning("third").unwrap();
    logger.error("dropped by threshold").unwrap();
    logger.debug("dropped by threshold").unwrap();

    logger
        .stop(Duration::from_secs(10), false)
        .expect("Worker did not shut down cleanly");
    assert!(!logger.is_running());

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("OTHER: first"));
    assert!(lines[1].ends_with("INFO: second"));
    assert!(lines[2].ends_with("WARNING: third"));
}

#[test]
fn test_process_worker_failure_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // A directory cannot be opened as a log file
    let spawner = ProcessSpawner::new(
        worker_exe(),
        vec![SinkConfig::file(temp_dir.path(), Severity::Debug)],
    );
    let logger = ProcessLogger::process("broken", Severity::Debug, spawner);
    logger.start().unwrap();

    let err = logger.stop(Duration::from_secs(10), false).unwrap_err();
    assert!(matches!(err, LoggerError::WorkerFailed { .. }), "{:?}", err);
}

#[test]
fn test_worker_binary_refuses_to_run_standalone() {
    let status = std::process::Command::new(worker_exe())
        .env_remove(WORKER_CONFIG_ENV)
        .stderr(std::process::Stdio::null())
        .status()
        .expect("Failed to run worker binary");
    assert_eq!(status.code(), Some(2));
}

#[test]
fn test_worker_binary_rejects_malformed_config() {
    let output = std::process::Command::new(worker_exe())
        .env(WORKER_CONFIG_ENV, "not json")
        .stdin(std::process::Stdio::null())
        .output()
        .expect("Failed to run worker binary");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"), "{}", stderr);
    assert!(stderr.contains(WORKER_CONFIG_ENV), "{}", stderr);
}

#[cfg(all(unix, feature = "async-worker"))]
#[test]
fn test_worker_binary_survives_interrupt() {
    use leveled_logger::core::Envelope;
    use leveled_logger::runtime::WorkerConfig;
    use std::io::Write;
    use std::process::{Command, Stdio};
    use std::time::Instant;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("interrupted.log");
    let config = WorkerConfig {
        name: "interrupted".to_string(),
        sinks: vec![SinkConfig::file(&log_file, Severity::Debug)],
    };

    let mut child = Command::new(worker_exe())
        .env(WORKER_CONFIG_ENV, serde_json::to_string(&config).unwrap())
        .stdin(Stdio::piped())
        .spawn()
        .expect("Failed to spawn worker binary");
    let mut stdin = child.stdin.take().unwrap();

    // The file exists once the sinks are initialized, after the handler is installed
    let deadline = Instant::now() + Duration::from_secs(10);
    while !log_file.exists() {
        assert!(Instant::now() < deadline, "worker never initialized its sink");
        std::thread::sleep(Duration::from_millis(10));
    }

    let mut send = |envelope: Envelope| {
        serde_json::to_writer(&mut stdin, &envelope).unwrap();
        stdin.write_all(b"\n").unwrap();
        stdin.flush().unwrap();
    };
    send(Envelope::Message(LogMessage::new(Severity::Info, "before interrupt")));

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to run kill");
    assert!(status.success());
    std::thread::sleep(Duration::from_millis(100));

    send(Envelope::Message(LogMessage::new(Severity::Info, "after interrupt")));
    send(Envelope::Shutdown);
    drop(stdin);

    let status = child.wait().expect("Failed to wait for worker");
    assert!(status.success(), "worker exited with {}", status);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("INFO: before interrupt"));
    assert!(lines[1].ends_with("INFO: after interrupt"));
}

#[test]
fn test_registry_returns_shared_loggers() {
    let registry = Arc::new(LoggerRegistry::new());
    let sink = MemorySink::new();
    let handle = sink.handle();

    let first = registry.get_logger("shared", Some(Severity::Info), Some(vec![Box::new(sink)]));
    first.start().unwrap();

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let logger = registry.get_logger("shared", None, None);
                logger.info(format!("from thread {}", t)).unwrap();
            })
        })
        .collect();
    for thread in threads {
        thread.join().expect("Thread panicked");
    }

    first.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).unwrap();
    assert_eq!(handle.len(), 4);
    assert_eq!(handle.finalize_count(), 1);
}

#[test]
fn test_lifecycle_errors_match_across_substrates() {
    fn check<S: leveled_logger::core::Spawner>(logger: Logger<S>) {
        assert!(matches!(logger.info("early"), Err(LoggerError::NotRunning { .. })));
        assert!(matches!(
            logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false),
            Err(LoggerError::NotRunning { .. })
        ));

        logger.start().unwrap();
        assert!(matches!(logger.start(), Err(LoggerError::AlreadyRunning { .. })));
        logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).unwrap();

        assert!(matches!(logger.start(), Err(LoggerError::AlreadyStopped { .. })));
        assert!(matches!(
            logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false),
            Err(LoggerError::AlreadyStopped { .. })
        ));
        assert!(matches!(logger.info("late"), Err(LoggerError::NotRunning { .. })));
    }

    check(SyncLogger::synchronous("sync", Severity::Debug, vec![Box::new(MemorySink::new())]));
    check(ThreadLogger::threaded("thread", Severity::Debug, vec![Box::new(MemorySink::new())]));
    check(ProcessLogger::process(
        "process",
        Severity::Debug,
        ProcessSpawner::new(worker_exe(), Vec::new()),
    ));
}

#[test]
fn test_filtered_message_never_fails() {
    let logger = ThreadLogger::threaded("quiet", Severity::Other, Vec::new());
    // Not started, but below the threshold: silently dropped
    logger.debug("ignored").unwrap();
}

#[cfg(feature = "async-worker")]
#[tokio::test]
async fn test_async_logger_writes_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("async.log");

    let sinks: Vec<Box<dyn AsyncSink>> = vec![Box::new(AsyncFileSink::new(&log_file))];
    let logger = AsyncLogger::new("async", Severity::Error, sinks);
    logger.start().unwrap();

    for i in 0..20 {
        logger.error(format!("Failure {}", i)).unwrap();
        logger.debug("hidden").unwrap();
    }
    logger.stop(DEFAULT_SHUTDOWN_TIMEOUT, false).await.unwrap();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 20);
    assert!(lines[19].ends_with("ERROR: Failure 19"));
}
