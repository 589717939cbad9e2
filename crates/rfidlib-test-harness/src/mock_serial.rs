//! Mock transport for deterministic testing of the inventory poller.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs, so polling cycles can be exercised against
//! captured reader output without hardware.
//!
//! # Example
//!
//! ```
//! use rfidlib_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // When the poller sends the inventory command, answer with this chunk.
//! mock.expect(&[0xBB, 0x00, 0x27, 0x00, 0x03, 0x22, 0xFF, 0xFF, 0x4A, 0x7E],
//!             &[0xBB, 0x01, 0xFF, 0x00, 0x01, 0x15, 0x16, 0x7E]);
//! // The next cycle gets no answer at all.
//! mock.expect_silence(&[0xBB, 0x00, 0x27, 0x00, 0x03, 0x22, 0xFF, 0xFF, 0x4A, 0x7E]);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use rfidlib_core::error::{Error, Result};
use rfidlib_core::transport::Transport;

#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// Bytes queued for `receive()` after the request; empty means the
    /// reader adds nothing and `receive()` times out once earlier bytes
    /// are consumed.
    response: Vec<u8>,
}

/// A mock [`Transport`] for testing without a reader attached.
///
/// Expectations are consumed in order. When `send()` is called, the sent
/// data is recorded and matched against the next expectation. The
/// corresponding response is appended after any bytes not yet read, like
/// a serial port's input buffer, and returned by the following `receive()`
/// calls at most one buffer's worth per call.
///
/// A mismatched request or an exhausted queue is a [`Error::Protocol`] error.
#[derive(Debug)]
pub struct MockTransport {
    expectations: VecDeque<Expectation>,
    pending_response: Option<Vec<u8>>,
    /// How many bytes of the pending response have been read so far.
    response_cursor: usize,
    connected: bool,
    close_fails: bool,
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            pending_response: None,
            response_cursor: 0,
            connected: true,
            close_fails: false,
            sent_log: Vec::new(),
        }
    }

    /// Add an expected request/response pair.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// Add an expected request that the reader does not answer.
    pub fn expect_silence(&mut self, request: &[u8]) {
        self.expect(request, &[]);
    }

    /// All data sent through this transport, one element per `send()` call.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Return the number of expectations that have not yet been consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent `send()` and `receive()` calls will
    /// return [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Make `close()` report [`Error::ConnectionLost`] after disconnecting.
    pub fn set_close_fails(&mut self, fails: bool) {
        self.close_fails = fails;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.sent_log.push(data.to_vec());

        match self.expectations.pop_front() {
            Some(expectation) if data == expectation.request.as_slice() => {
                let mut pending = match self.pending_response.take() {
                    Some(unread) => unread[self.response_cursor..].to_vec(),
                    None => Vec::new(),
                };
                pending.extend_from_slice(&expectation.response);
                self.response_cursor = 0;
                self.pending_response = (!pending.is_empty()).then_some(pending);
                Ok(())
            }
            Some(expectation) => Err(Error::Protocol(format!(
                "unexpected send data: expected {:02X?}, got {:02X?}",
                expectation.request, data
            ))),
            None => Err(Error::Protocol(
                "no more expectations in mock transport".into(),
            )),
        }
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        let Some(response) = self.pending_response.as_ref() else {
            return Err(Error::Timeout);
        };

        let remaining = &response[self.response_cursor..];
        if remaining.is_empty() {
            self.pending_response = None;
            self.response_cursor = 0;
            return Err(Error::Timeout);
        }

        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.response_cursor += n;
        if self.response_cursor >= response.len() {
            self.pending_response = None;
            self.response_cursor = 0;
        }
        Ok(n)
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.pending_response = None;
        self.response_cursor = 0;
        if self.close_fails {
            return Err(Error::ConnectionLost);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
