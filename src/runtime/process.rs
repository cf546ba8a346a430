//! Isolated worker process fed over its stdin
//!
//! The parent launches a program with the worker configuration (JSON) in the
//! [`WORKER_CONFIG_ENV`] environment variable and streams one JSON
//! [`Envelope`] per line into the child's stdin. The child rebuilds its sinks
//! from [`SinkConfig`]s, because boxed sinks cannot cross a process boundary.
//!
//! Any binary can serve as the worker by calling [`run_worker_if_requested`]
//! first thing in `main`:
//!
//! ```no_run
//! fn main() -> leveled_logger::Result<()> {
//!     if leveled_logger::runtime::process::run_worker_if_requested()? {
//!         return Ok(());
//!     }
//!
//!     // regular program
//!     Ok(())
//! }
//! ```
//!
//! The crate also ships a stock `leveled-logger-worker` binary doing just that.

use crate::core::{
    spawner::wait_until,
    worker::{run_worker, Receive, Received, WorkerExit},
    Envelope, Logger, LoggerError, Result, Severity, Sink, Spawner, Transport, WorkerHandle,
};
use crate::sinks::SinkConfig;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::{BufRead, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::Duration;

/// Environment variable carrying the JSON [`WorkerConfig`] to the child
pub const WORKER_CONFIG_ENV: &str = "LEVELED_LOGGER_WORKER";

/// Everything a worker process needs to rebuild its side of the logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub name: String,
    pub sinks: Vec<SinkConfig>,
}

impl WorkerConfig {
    pub fn build_sinks(&self) -> Result<Vec<Box<dyn Sink>>> {
        self.sinks.iter().map(SinkConfig::build).collect()
    }
}

pub struct ProcessSpawner {
    program: PathBuf,
    args: Vec<OsString>,
    sinks: Vec<SinkConfig>,
}

impl ProcessSpawner {
    /// Use `program` as the worker executable
    pub fn new(program: impl Into<PathBuf>, sinks: Vec<SinkConfig>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            sinks,
        }
    }

    /// Re-launch the running executable as the worker
    ///
    /// The program must call [`run_worker_if_requested`] at startup.
    pub fn current_exe(sinks: Vec<SinkConfig>) -> Result<Self> {
        let program = std::env::current_exe()
            .map_err(|e| LoggerError::io_operation("locating current executable", "", e))?;
        Ok(Self::new(program, sinks))
    }

    /// Append a command-line argument for the worker program
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Spawner for ProcessSpawner {
    type Transport = PipeTransport;
    type Handle = ProcessHandle;

    fn spawn(&mut self, name: &str) -> Result<(PipeTransport, ProcessHandle)> {
        let config = serde_json::to_string(&WorkerConfig {
            name: name.to_string(),
            sinks: self.sinks.clone(),
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(WORKER_CONFIG_ENV, config)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawning worker process",
                    self.program.display().to_string(),
                    e,
                )
            })?;

        let Some(stdin) = child.stdin.take() else {
            // Never happens with Stdio::piped(); do not leave the child behind
            let _ = child.kill();
            let _ = child.wait();
            return Err(LoggerError::other("worker process has no stdin"));
        };

        let (sender, receiver) = unbounded();
        let feeder_name = name.to_string();
        let spawned = thread::Builder::new()
            .name(format!("{}_logger_feeder", name))
            .spawn(move || feed_pipe(&feeder_name, &receiver, stdin));
        if let Err(e) = spawned {
            let _ = child.kill();
            let _ = child.wait();
            return Err(LoggerError::io_operation("spawning pipe feeder thread", name, e));
        }

        Ok((
            PipeTransport { sender },
            ProcessHandle {
                name: name.to_string(),
                child: Mutex::new(child),
            },
        ))
    }
}

/// Copy queued envelopes into the child's stdin, one JSON line each.
///
/// Runs until every producer is gone or the pipe breaks. Dropping `stdin` on
/// return is the end-of-input the worker treats as cancellation.
fn feed_pipe(name: &str, queue: &Receiver<Envelope>, mut stdin: ChildStdin) {
    for envelope in queue {
        let written = serde_json::to_vec(&envelope)
            .map_err(LoggerError::from)
            .and_then(|mut line| {
                line.push(b'\n');
                stdin.write_all(&line)?;
                stdin.flush()?;
                Ok(())
            });

        if let Err(e) = written {
            eprintln!(
                "[LOGGER ERROR] Lost the pipe to worker process of '{}': {}",
                name, e
            );
            return;
        }
    }
}

/// Producer side: an unbounded queue drained into the child's stdin.
///
/// `send` never waits on the child, so a worker that stops reading cannot
/// block producers or delay `stop` past its deadline.
pub struct PipeTransport {
    sender: Sender<Envelope>,
}

impl Transport for PipeTransport {
    fn send(&self, envelope: Envelope) -> Result<()> {
        self.sender
            .send(envelope)
            .map_err(|_| LoggerError::ChannelSendError)
    }
}

pub struct ProcessHandle {
    name: String,
    child: Mutex<Child>,
}

impl WorkerHandle for ProcessHandle {
    fn is_alive(&self) -> bool {
        matches!(self.child.lock().try_wait(), Ok(None))
    }

    fn join_timeout(&mut self, timeout: Duration) -> Result<bool> {
        let child = self.child.get_mut();
        let mut exit_status = None;
        let mut wait_error = None;

        let finished = wait_until(timeout, || match child.try_wait() {
            Ok(Some(status)) => {
                exit_status = Some(status);
                true
            }
            Ok(None) => false,
            Err(e) => {
                wait_error = Some(e);
                true
            }
        });

        if let Some(e) = wait_error {
            return Err(LoggerError::io_operation("waiting for worker process", &self.name, e));
        }
        match exit_status {
            Some(status) if status.success() => Ok(true),
            Some(status) => Err(LoggerError::worker_failed(
                &self.name,
                format!("worker process exited with {}", status),
            )),
            None => Ok(finished),
        }
    }

    fn terminate(&mut self) -> Result<()> {
        let child = self.child.get_mut();
        match child.kill() {
            Ok(()) => {}
            // Already exited
            Err(e) if e.kind() == ErrorKind::InvalidInput => {}
            Err(e) => {
                return Err(LoggerError::io_operation("killing worker process", &self.name, e))
            }
        }
        // The feeder sees a broken pipe and exits on its own
        child.wait()?;
        Ok(())
    }
}

/// Logger delivering from an isolated worker process
pub type ProcessLogger = Logger<ProcessSpawner>;

impl Logger<ProcessSpawner> {
    /// Create a logger backed by a worker process
    #[must_use]
    pub fn process(name: impl Into<String>, threshold: Severity, spawner: ProcessSpawner) -> Self {
        Self::with_spawner(name, threshold, spawner)
    }
}

/// Worker side: reads newline-delimited JSON envelopes.
///
/// End of input means the parent went away and counts as cancellation.
pub struct LineReceiver<R> {
    input: R,
    line: String,
}

impl<R: BufRead> LineReceiver<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
        }
    }
}

impl<R: BufRead> Receive for LineReceiver<R> {
    fn receive(&mut self) -> Result<Received> {
        loop {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(Received::Cancelled);
            }

            let line = self.line.trim();
            if line.is_empty() {
                continue;
            }
            return Ok(Received::Item(serde_json::from_str(line)?));
        }
    }
}

/// Run the worker loop over `input` with the sinks described by `config`
pub fn run_worker_process<R: BufRead>(config: &WorkerConfig, input: R) -> Result<WorkerExit> {
    let mut sinks = config.build_sinks()?;
    let mut receiver = LineReceiver::new(input);

    run_worker(&mut receiver, &mut sinks).inspect_err(|e| {
        eprintln!(
            "[LOGGER ERROR] Worker process of '{}' stopped: {}",
            config.name, e
        );
    })
}

/// Act as a worker process when launched by [`ProcessSpawner`].
///
/// Returns `Ok(false)` without doing anything when [`WORKER_CONFIG_ENV`] is not
/// set, and `Ok(true)` after the worker loop has run to completion.
pub fn run_worker_if_requested() -> Result<bool> {
    let Ok(raw) = std::env::var(WORKER_CONFIG_ENV) else {
        return Ok(false);
    };

    let config: WorkerConfig = serde_json::from_str(&raw)
        .map_err(|e| LoggerError::config(WORKER_CONFIG_ENV, e.to_string()))?;

    #[cfg(all(unix, feature = "async-worker"))]
    let _interrupts = InterruptGuard::install()?;

    run_worker_process(&config, std::io::stdin().lock())?;
    Ok(true)
}

/// Keeps SIGINT from killing the worker while it is held.
///
/// Ctrl-C in a terminal reaches the whole foreground process group, parent and
/// worker alike. The worker ignores it and keeps draining until the parent sends
/// `Shutdown` or closes the pipe, so a parent that stops on Ctrl-C still gets its
/// backlog written and its sinks finalized.
#[cfg(all(unix, feature = "async-worker"))]
struct InterruptGuard {
    _signal: tokio::signal::unix::Signal,
    _runtime: tokio::runtime::Runtime,
}

#[cfg(all(unix, feature = "async-worker"))]
impl InterruptGuard {
    fn install() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()
            .map_err(|e| LoggerError::io_operation("building signal runtime", "SIGINT", e))?;
        // Registering a listener replaces the default terminate action
        let signal = {
            let _enter = runtime.enter();
            signal(SignalKind::interrupt())
                .map_err(|e| LoggerError::io_operation("registering handler", "SIGINT", e))?
        };

        Ok(Self {
            _signal: signal,
            _runtime: runtime,
        })
    }
}
