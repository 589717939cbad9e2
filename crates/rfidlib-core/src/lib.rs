//! rfidlib-core: Core traits, types, and error definitions for rfidlib.
//!
//! This crate defines the reader-agnostic pieces that the transport, mock,
//! and protocol crates share.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`EpcId`] -- 12-byte tag identifier with canonical hex display
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
pub use transport::Transport;
pub use types::{EPC_LEN, EpcId, ParseEpcError};
