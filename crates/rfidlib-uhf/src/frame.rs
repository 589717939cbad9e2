//! Tag-report frame scanner and EPC extractor.
//!
//! During a multi-poll inventory the reader streams one notification frame
//! per tag sighting. Frames carry no usable length field from the host's
//! point of view, so boundaries are recovered by locating a fixed header.
//!
//! # Frame format
//!
//! ```text
//! BB 02 22 00 11 | <prefix: 3> <epc: 12> <suffix: 4>
//! ^^^^^^^^^^^^^^   ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//!     header                    frame body
//! ```
//!
//! - Header: start byte, notification type, poll command, payload length
//!   `0x0011`. Used only as a boundary marker.
//! - Prefix: RSSI and protocol-control word.
//! - EPC: the 12-byte tag identifier.
//! - Suffix: tag CRC, frame checksum, end byte. Not validated.
//!
//! A body runs from the end of one header to the start of the next header
//! or the end of the chunk, so a truncated trailing frame simply yields a
//! body of the wrong length and is dropped by [`extract_epc`].

use rfidlib_core::types::{EPC_LEN, EpcId};

use crate::commands::{CMD_SINGLE_POLL, FRAME_START, TYPE_NOTIFICATION};

/// Boundary marker preceding every tag-report frame body.
pub const FRAME_HEADER: [u8; 5] = [
    FRAME_START,
    TYPE_NOTIFICATION,
    CMD_SINGLE_POLL,
    0x00,
    0x11,
];

/// Bytes between the header and the EPC.
pub const EPC_PREFIX_LEN: usize = 3;

/// Bytes between the EPC and the next frame.
pub const EPC_SUFFIX_LEN: usize = 4;

/// Length of a well-formed frame body.
pub const FRAME_BODY_LEN: usize = EPC_PREFIX_LEN + EPC_LEN + EPC_SUFFIX_LEN;

/// Iterator over the candidate frame bodies of one chunk.
///
/// Created by [`scan`]. Each call to `next` finds the next header at or after
/// the search offset, yields the bytes up to the following header (or the
/// end of the chunk), and moves the search offset to one byte past the
/// start of the matched header.
#[derive(Debug, Clone)]
pub struct FrameScanner<'a> {
    chunk: &'a [u8],
    search_from: usize,
}

impl<'a> Iterator for FrameScanner<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let header_pos = find_header(self.chunk, self.search_from)?;
        let body_start = header_pos + FRAME_HEADER.len();
        let body_end = find_header(self.chunk, body_start).unwrap_or(self.chunk.len());

        // Step from the header start, not its end. The header cannot overlap
        // itself, so this lands on the same boundaries as skipping it.
        self.search_from = header_pos + 1;

        Some(&self.chunk[body_start..body_end])
    }
}

impl std::iter::FusedIterator for FrameScanner<'_> {}

/// Scan a chunk for frame bodies.
///
/// Bodies are yielded without any validity check; an empty chunk or one
/// without a header yields nothing.
///
/// # Example
///
/// ```
/// use rfidlib_uhf::frame::{scan, FRAME_HEADER};
///
/// let mut chunk = FRAME_HEADER.to_vec();
/// chunk.extend_from_slice(&[0x01, 0x02]);
/// chunk.extend_from_slice(&FRAME_HEADER);
/// chunk.extend_from_slice(&[0x03]);
///
/// let bodies: Vec<&[u8]> = scan(&chunk).collect();
/// assert_eq!(bodies, [&[0x01u8, 0x02][..], &[0x03u8][..]]);
/// ```
pub fn scan(chunk: &[u8]) -> FrameScanner<'_> {
    FrameScanner {
        chunk,
        search_from: 0,
    }
}

/// Extract the EPC from one frame body.
///
/// Drops [`EPC_PREFIX_LEN`] bytes from the front and [`EPC_SUFFIX_LEN`]
/// from the back; returns `None` unless exactly [`EPC_LEN`] bytes remain.
///
/// # Example
///
/// ```
/// use rfidlib_uhf::frame::extract_epc;
///
/// let body = [
///     0xC9, 0x34, 0x00,
///     0xE2, 0x80, 0x68, 0x94, 0x00, 0x00, 0x50, 0x1D, 0x6F, 0xBB, 0xC4, 0xE1,
///     0x2D, 0x8F, 0x4C, 0x7E,
/// ];
/// let epc = extract_epc(&body).unwrap();
/// assert_eq!(epc.to_string(), "E28068940000501D6FBBC4E1");
///
/// assert!(extract_epc(&body[..18]).is_none());
/// ```
pub fn extract_epc(body: &[u8]) -> Option<EpcId> {
    let end = body.len().checked_sub(EPC_SUFFIX_LEN)?;
    body.get(EPC_PREFIX_LEN..end).and_then(EpcId::from_slice)
}

/// Scan a chunk and extract every valid EPC, in stream order.
///
/// Duplicates are kept; deduplication is the accumulator's job.
pub fn epcs(chunk: &[u8]) -> impl Iterator<Item = EpcId> + '_ {
    scan(chunk).filter_map(|body| {
        let epc = extract_epc(body);
        if epc.is_none() {
            tracing::trace!(
                body_len = body.len(),
                body = ?body,
                "Discarding malformed frame body"
            );
        }
        epc
    })
}

/// Position of the first header at or after `from`.
fn find_header(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(FRAME_HEADER.len())
        .position(|w| w == FRAME_HEADER)
        .map(|rel| from + rel)
}
