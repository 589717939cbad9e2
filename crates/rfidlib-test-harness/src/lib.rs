//! rfidlib-test-harness: Test utilities for rfidlib.
//!
//! This crate provides [`MockTransport`] for deterministic testing of the
//! inventory poller without real reader hardware. The `rfid-poll` binary
//! also uses it for its `--mock` mode.

pub mod mock_serial;

pub use mock_serial::MockTransport;
