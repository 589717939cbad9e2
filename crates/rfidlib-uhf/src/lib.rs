//! UHF RFID reader backend for rfidlib.
//!
//! This crate implements inventory polling for serial UHF reader modules
//! that answer a multi-poll command with a stream of tag-report frames.
//! It provides:
//!
//! - **Frame scanner and EPC extractor** ([`frame`]) -- locate tag-report
//!   frames in an arbitrary chunk of bytes and pull out 12-byte EPCs,
//!   dropping malformed or truncated records.
//! - **Accumulator** ([`accumulator`]) -- per-cycle set of unique EPCs.
//! - **Command encoding** ([`commands`]) -- frame layout, checksum, and the
//!   fixed inventory command.
//! - **InventoryReader** ([`reader`]) -- one command/response exchange per
//!   poll over a [`Transport`](rfidlib_core::Transport).
//! - **ReaderBuilder** ([`builder`]) -- serial and timeout configuration.
//!
//! # Example
//!
//! ```
//! use rfidlib_uhf::EpcAccumulator;
//! use rfidlib_uhf::frame::FRAME_HEADER;
//!
//! // One tag report as it arrives from the reader.
//! let mut chunk = FRAME_HEADER.to_vec();
//! chunk.extend_from_slice(&[0xC9, 0x34, 0x00]);
//! chunk.extend_from_slice(&[0xE2, 0x80, 0x68, 0x94, 0x00, 0x00, 0x50, 0x1D, 0x6F, 0xBB, 0xC4, 0xE1]);
//! chunk.extend_from_slice(&[0x2D, 0x8F, 0x4C, 0x7E]);
//!
//! let mut acc = EpcAccumulator::new();
//! acc.extend_from_chunk(&chunk);
//!
//! let epcs = acc.drain();
//! assert_eq!(epcs[0].to_string(), "E28068940000501D6FBBC4E1");
//! ```

pub mod accumulator;
pub mod builder;
pub mod commands;
pub mod frame;
pub mod reader;

pub use accumulator::EpcAccumulator;
pub use builder::ReaderBuilder;
pub use reader::InventoryReader;
