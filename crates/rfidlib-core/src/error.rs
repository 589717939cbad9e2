//! Error types for rfidlib.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Malformed tag records are not errors;
//! the frame scanner drops them. What remains here are transport failures
//! and invalid configuration.

/// The error type for all rfidlib operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port could not be opened or configured).
    #[error("transport error: {0}")]
    Transport(String),

    /// A protocol-level error (unexpected bytes from a scripted or real reader).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Timed out waiting for bytes from the reader.
    ///
    /// Routine during inventory polling when no tag is in the field and the
    /// reader stays silent.
    #[error("timeout waiting for response")]
    Timeout,

    /// An invalid parameter was passed to a builder or command encoder.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No connection to the reader has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the reader was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_transport() {
        let e = Error::Transport("port busy".into());
        assert_eq!(e.to_string(), "transport error: port busy");
    }

    #[test]
    fn error_display_protocol() {
        let e = Error::Protocol("unexpected command bytes".into());
        assert_eq!(e.to_string(), "protocol error: unexpected command bytes");
    }

    #[test]
    fn error_display_timeout() {
        assert_eq!(Error::Timeout.to_string(), "timeout waiting for response");
    }

    #[test]
    fn error_display_invalid_parameter() {
        let e = Error::InvalidParameter("read buffer must not be empty".into());
        assert_eq!(
            e.to_string(),
            "invalid parameter: read buffer must not be empty"
        );
    }

    #[test]
    fn error_display_connection_states() {
        assert_eq!(Error::NotConnected.to_string(), "not connected");
        assert_eq!(Error::ConnectionLost.to_string(), "connection lost");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
