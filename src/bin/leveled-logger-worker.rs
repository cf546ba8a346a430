//! Stock worker executable for `ProcessSpawner`
//!
//! Reads the worker configuration from `LEVELED_LOGGER_WORKER` and drains
//! envelopes from stdin until shutdown or EOF.

use leveled_logger::runtime::process::{run_worker_if_requested, WORKER_CONFIG_ENV};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run_worker_if_requested() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!(
                "[LOGGER ERROR] {} is not set; this program is launched by a process logger",
                WORKER_CONFIG_ENV
            );
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("[LOGGER ERROR] Worker failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
