//! Network sink for remote logging
//!
//! Sends formatted lines to a remote server over TCP. The connection is made in
//! `initialize` and shut down in `finalize`.

use crate::core::{format_line, LogMessage, LoggerError, Result, Severity, Sink};
use std::io::{BufWriter, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Network sink that sends logs to a remote TCP server
///
/// # Example
///
/// ```no_run
/// use leveled_logger::prelude::*;
/// use leveled_logger::sinks::NetworkSink;
///
/// let logger = LoggerBuilder::new("remote")
///     .sink(NetworkSink::new("127.0.0.1:8080"))
///     .build_threaded();
/// logger.start().unwrap();
/// logger.info("This line will be sent to 127.0.0.1:8080").unwrap();
/// ```
pub struct NetworkSink {
    address: String,
    threshold: Severity,
    timeout: Duration,
    stream: Option<BufWriter<TcpStream>>,
}

impl NetworkSink {
    /// Default connect and write timeout (5 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a sink for `address` (e.g. "localhost:8080", "192.168.1.1:9000")
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            threshold: Severity::Debug,
            timeout: Self::DEFAULT_TIMEOUT,
            stream: None,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the connect and write timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn connect(&self) -> std::io::Result<TcpStream> {
        let mut last_err = None;
        for addr in self.address.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    // Set timeouts to prevent hanging
                    stream.set_write_timeout(Some(self.timeout))?;
                    // Enable TCP_NODELAY for low-latency logging
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "address resolved to nothing")
        }))
    }
}

impl Sink for NetworkSink {
    fn initialize(&mut self) -> Result<()> {
        let stream = self
            .connect()
            .map_err(|e| LoggerError::io_operation("connecting to log server", &self.address, e))?;
        self.stream = Some(BufWriter::new(stream));
        Ok(())
    }

    fn deliver(&mut self, message: &LogMessage) -> Result<()> {
        if !message.severity().passes(self.threshold) {
            return Ok(());
        }

        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Network stream not connected"))?;
        stream.write_all(format_line(message, None).as_bytes())?;
        stream.flush()?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.flush()?;
            let _ = stream.get_ref().shutdown(Shutdown::Both);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "network"
    }
}
