//! Transport implementations for rfidlib.
//!
//! This crate provides [`SerialTransport`], the concrete
//! [`Transport`](rfidlib_core::Transport) used to talk to UHF reader modules
//! over USB-to-UART adapters and on-board serial ports.

pub mod serial;

pub use serial::{DataBits, FlowControl, Parity, SerialConfig, SerialTransport, StopBits};
