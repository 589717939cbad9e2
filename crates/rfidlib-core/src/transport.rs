//! Transport trait for reader communication.
//!
//! The [`Transport`] trait abstracts over the physical link to an RFID
//! reader. `rfidlib-transport` implements it for serial ports and
//! `rfidlib-test-harness` provides a scripted mock, so the inventory poller
//! in `rfidlib-uhf` runs the same code against hardware and in unit tests.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to a reader.
///
/// Implementations deliver raw bytes only. They make no attempt to align
/// reads with frame boundaries; locating frames is the scanner's job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the reader, returning once they are written out.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the reader into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Will wait up to `timeout`
    /// for data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if nothing arrives within the deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// After calling `close()`, subsequent `send()` and `receive()` calls
    /// should return [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
