//! ReaderBuilder -- fluent builder for constructing [`InventoryReader`]s.
//!
//! Separates configuration from construction so that callers can set up
//! serial parameters, timeouts, and the inventory command before the port
//! is opened.
//!
//! # Example
//!
//! ```no_run
//! use rfidlib_uhf::ReaderBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> rfidlib_core::Result<()> {
//! let reader = ReaderBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .baud_rate(115_200)
//!     .read_timeout(Duration::from_secs(1))
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use rfidlib_core::error::{Error, Result};
use rfidlib_core::transport::Transport;

use crate::commands::INVENTORY_COMMAND;
use crate::reader::{InventoryReader, ReadLimits};

/// Default serial speed of UHF reader modules.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default wait for a response to the inventory command.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default size of the buffer handed to each transport read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Default wait for further bytes once the reader has started answering.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_millis(20);

/// Default cap on the bytes collected by one poll.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 64 * 1024;

/// Fluent builder for [`InventoryReader`].
#[derive(Debug, Clone)]
pub struct ReaderBuilder {
    serial_port: Option<String>,
    baud_rate: u32,
    read_timeout: Duration,
    read_buffer_size: usize,
    drain_timeout: Duration,
    max_chunk_size: usize,
    command: Vec<u8>,
}

impl ReaderBuilder {
    /// Create a builder with reader defaults.
    pub fn new() -> Self {
        ReaderBuilder {
            serial_port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            command: INVENTORY_COMMAND.to_vec(),
        }
    }

    /// Set the serial port path (e.g. `/dev/ttyUSB0` or `COM4`).
    pub fn serial_port(mut self, port: &str) -> Self {
        self.serial_port = Some(port.to_string());
        self
    }

    /// Override the baud rate (default: 115200).
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }

    /// Set how long each poll waits for the reader (default: 1s).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the maximum number of bytes taken from one read (default: 1024).
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Set how long a poll keeps waiting for more bytes after the first
    /// read (default: 20ms).
    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Cap the bytes one poll collects before scanning (default: 64 KiB).
    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    /// Replace the command sent each cycle.
    ///
    /// Defaults to [`INVENTORY_COMMAND`]. See
    /// [`multi_poll_command`](crate::commands::multi_poll_command) for other
    /// round counts.
    pub fn command(mut self, command: &[u8]) -> Self {
        self.command = command.to_vec();
        self
    }

    /// Build an [`InventoryReader`] with a caller-provided transport.
    ///
    /// This is the entry point for tests (pass a `MockTransport` from
    /// `rfidlib-test-harness`) and for callers that manage the transport
    /// themselves.
    pub async fn build_with_transport(
        self,
        transport: Box<dyn Transport>,
    ) -> Result<InventoryReader> {
        if self.read_buffer_size == 0 {
            return Err(Error::InvalidParameter(
                "read_buffer_size must be greater than zero".into(),
            ));
        }
        if self.max_chunk_size == 0 {
            return Err(Error::InvalidParameter(
                "max_chunk_size must be greater than zero".into(),
            ));
        }
        if self.command.is_empty() {
            return Err(Error::InvalidParameter(
                "inventory command must not be empty".into(),
            ));
        }

        let limits = ReadLimits {
            read_timeout: self.read_timeout,
            drain_timeout: self.drain_timeout,
            read_buffer_size: self.read_buffer_size,
            max_chunk_size: self.max_chunk_size,
        };
        Ok(InventoryReader::new(transport, self.command, limits))
    }

    /// Build an [`InventoryReader`] on a serial port.
    ///
    /// Requires that [`serial_port()`](Self::serial_port) has been called.
    pub async fn build(self) -> Result<InventoryReader> {
        let port = self
            .serial_port
            .as_ref()
            .ok_or_else(|| Error::InvalidParameter("serial_port is required for build()".into()))?;

        let transport = rfidlib_transport::SerialTransport::open(port, self.baud_rate).await?;
        self.build_with_transport(Box::new(transport)).await
    }
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfidlib_test_harness::MockTransport;

    #[tokio::test]
    async fn builder_defaults() {
        let reader = ReaderBuilder::new()
            .build_with_transport(Box::new(MockTransport::new()))
            .await
            .unwrap();

        assert_eq!(reader.command(), &INVENTORY_COMMAND);
        assert_eq!(reader.read_timeout(), Duration::from_secs(1));
        assert_eq!(reader.drain_timeout(), DEFAULT_DRAIN_TIMEOUT);
        assert_eq!(reader.max_chunk_size(), DEFAULT_MAX_CHUNK_SIZE);
        assert!(reader.is_connected());
    }

    #[tokio::test]
    async fn builder_fluent_chain() {
        let reader = ReaderBuilder::new()
            .serial_port("/dev/ttyUSB0")
            .baud_rate(57_600)
            .read_timeout(Duration::from_millis(250))
            .read_buffer_size(256)
            .drain_timeout(Duration::from_millis(5))
            .max_chunk_size(4096)
            .build_with_transport(Box::new(MockTransport::new()))
            .await
            .unwrap();

        assert_eq!(reader.read_timeout(), Duration::from_millis(250));
        assert_eq!(reader.drain_timeout(), Duration::from_millis(5));
        assert_eq!(reader.max_chunk_size(), 4096);
    }

    #[tokio::test]
    async fn builder_rejects_zero_chunk_cap() {
        let result = ReaderBuilder::new()
            .max_chunk_size(0)
            .build_with_transport(Box::new(MockTransport::new()))
            .await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn builder_rejects_zero_buffer() {
        let result = ReaderBuilder::new()
            .read_buffer_size(0)
            .build_with_transport(Box::new(MockTransport::new()))
            .await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn builder_rejects_empty_command() {
        let result = ReaderBuilder::new()
            .command(&[])
            .build_with_transport(Box::new(MockTransport::new()))
            .await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn builder_serial_port_required_for_build() {
        let result = ReaderBuilder::new().build().await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }
}
