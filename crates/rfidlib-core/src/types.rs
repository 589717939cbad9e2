//! Tag identifier types.
//!
//! An [`EpcId`] is the 12-byte Electronic Product Code reported by a UHF
//! reader for each tag it sees. Identity is byte equality; the canonical
//! text form is 24 uppercase hex characters.
//!
//! # Example
//!
//! ```
//! use rfidlib_core::EpcId;
//!
//! let epc: EpcId = "e28068940000501d6fbbc4e1".parse().unwrap();
//! assert_eq!(epc.to_string(), "E28068940000501D6FBBC4E1");
//! ```

use std::fmt;
use std::str::FromStr;

/// Length of an EPC in bytes.
pub const EPC_LEN: usize = 12;

/// A 12-byte tag identifier.
///
/// Ordering follows the raw bytes, which matches the lexical order of the
/// uppercase hex form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpcId([u8; EPC_LEN]);

impl EpcId {
    /// Wrap raw EPC bytes.
    pub const fn new(bytes: [u8; EPC_LEN]) -> Self {
        EpcId(bytes)
    }

    /// Build an EPC from a slice, or `None` unless it is exactly
    /// [`EPC_LEN`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; EPC_LEN]>::try_from(bytes).ok().map(EpcId)
    }

    /// The raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; EPC_LEN] {
        &self.0
    }
}

impl fmt::Display for EpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for EpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpcId({self})")
    }
}

impl From<[u8; EPC_LEN]> for EpcId {
    fn from(bytes: [u8; EPC_LEN]) -> Self {
        EpcId(bytes)
    }
}

/// Error returned when parsing an [`EpcId`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEpcError(String);

impl fmt::Display for ParseEpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid EPC: '{}' (expected {} hex digits)",
            self.0,
            EPC_LEN * 2
        )
    }
}

impl std::error::Error for ParseEpcError {}

impl FromStr for EpcId {
    type Err = ParseEpcError;

    /// Parse 24 hex digits, upper or lower case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.len() != EPC_LEN * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseEpcError(s.to_string()));
        }

        let mut bytes = [0u8; EPC_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| ParseEpcError(s.to_string()))?;
        }
        Ok(EpcId(bytes))
    }
}
