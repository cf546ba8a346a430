//! Concurrency substrates the logger facade can run on

pub mod inline;
pub mod process;
pub mod thread;

#[cfg(feature = "async-worker")]
pub mod task;

pub use inline::InlineSpawner;
pub use process::{ProcessLogger, ProcessSpawner, WorkerConfig};
pub use thread::ThreadSpawner;

#[cfg(feature = "async-worker")]
pub use task::{AsyncLogger, TaskSpawner};
