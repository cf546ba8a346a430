//! Sink implementations

pub mod config;
pub mod console;
pub mod file;
pub mod memory;
pub mod network;

#[cfg(feature = "async-worker")]
pub mod async_console;
#[cfg(feature = "async-worker")]
pub mod async_file;

pub use config::SinkConfig;
pub use console::ConsoleSink;
pub use file::FileSink;
pub use memory::{MemoryHandle, MemorySink};
pub use network::NetworkSink;

#[cfg(feature = "async-worker")]
pub use async_console::{AsyncConsoleSink, DrainWriter, OffloadedStdout, StreamStdout};
#[cfg(feature = "async-worker")]
pub use async_file::AsyncFileSink;
