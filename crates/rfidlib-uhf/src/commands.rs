//! Reader command encoding.
//!
//! Host-to-reader frames share one layout with the reader's replies:
//!
//! ```text
//! 0xBB <type> <cmd> <len_hi> <len_lo> [<param>...] <checksum> 0x7E
//! ```
//!
//! - `type`: `0x00` command, `0x01` response, `0x02` notification
//! - `len`: big-endian parameter count
//! - `checksum`: low byte of the sum of every byte from `type` through the
//!   last parameter

use bytes::{BufMut, BytesMut};
use rfidlib_core::error::{Error, Result};

/// First byte of every frame.
pub const FRAME_START: u8 = 0xBB;

/// Last byte of every frame.
pub const FRAME_END: u8 = 0x7E;

/// Frame type: host command.
pub const TYPE_COMMAND: u8 = 0x00;

/// Frame type: unsolicited notification (tag reports during inventory).
pub const TYPE_NOTIFICATION: u8 = 0x02;

/// Single inventory round. Tag reports carry this command code too.
pub const CMD_SINGLE_POLL: u8 = 0x22;

/// Repeated inventory rounds.
pub const CMD_MULTI_POLL: u8 = 0x27;

/// Reserved byte that precedes the round count in a multi-poll command.
const MULTI_POLL_RESERVED: u8 = 0x22;

/// The command sent once per polling cycle: multi-poll with the maximum
/// round count (`0xFFFF`).
pub const INVENTORY_COMMAND: [u8; 10] = [
    0xBB, 0x00, 0x27, 0x00, 0x03, 0x22, 0xFF, 0xFF, 0x4A, 0x7E,
];

/// Checksum over a frame's `type..params` span.
///
/// # Example
///
/// ```
/// use rfidlib_uhf::commands::checksum;
///
/// assert_eq!(checksum(&[0x00, 0x27, 0x00, 0x03, 0x22, 0xFF, 0xFF]), 0x4A);
/// ```
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Encode a host command frame.
///
/// Fails with [`Error::InvalidParameter`] if `params` does not fit the
/// 16-bit length field.
pub fn encode_command(cmd: u8, params: &[u8]) -> Result<Vec<u8>> {
    let len = u16::try_from(params.len()).map_err(|_| {
        Error::InvalidParameter(format!(
            "command parameters too long: {} bytes",
            params.len()
        ))
    })?;
    Ok(encode_frame(TYPE_COMMAND, cmd, len, params))
}

/// Multi-poll command for `count` inventory rounds.
///
/// # Example
///
/// ```
/// use rfidlib_uhf::commands::{multi_poll_command, INVENTORY_COMMAND};
///
/// assert_eq!(multi_poll_command(0xFFFF), INVENTORY_COMMAND.to_vec());
/// ```
pub fn multi_poll_command(count: u16) -> Vec<u8> {
    let [hi, lo] = count.to_be_bytes();
    encode_frame(TYPE_COMMAND, CMD_MULTI_POLL, 3, &[MULTI_POLL_RESERVED, hi, lo])
}

fn encode_frame(frame_type: u8, cmd: u8, len: u16, params: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(1 + 4 + params.len() + 2);
    buf.put_u8(FRAME_START);
    buf.put_u8(frame_type);
    buf.put_u8(cmd);
    buf.put_u16(len);
    buf.put_slice(params);
    let sum = checksum(&buf[1..]);
    buf.put_u8(sum);
    buf.put_u8(FRAME_END);
    buf.to_vec()
}
