//! Error types for the protocol core.

use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the handshake, the record layer, and the payload codec.
///
/// Every variant is recoverable to the caller; none is fatal to the process.
/// Record-layer failures additionally poison the session that produced them.
#[derive(Error, Debug)]
pub enum Error {
    /// Handshake or payload bytes are truncated, over-long, or structurally
    /// invalid.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// No protocol version is supported by both endpoints.
    #[error("no mutually supported protocol version")]
    VersionMismatch,

    /// Signature verification or AEAD authentication failed.
    #[error("authentication failed")]
    AuthFailure,

    /// An incoming record frame carries an unexpected counter.
    #[error("record counter out of sequence: expected {expected}, got {got}")]
    ReplayOrReorder {
        /// The counter the session expected next.
        expected: u64,
        /// The counter carried by the frame.
        got: u64,
    },

    /// The send counter reached its maximum; the session must be torn down.
    #[error("send counter exhausted")]
    CounterExhausted,

    /// The payload reader ran out of bytes mid-record.
    #[error("truncated parameter: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the next read required.
        needed: usize,
        /// Bytes left in the parameter stream.
        remaining: usize,
    },

    /// A parameter record's length does not match the requested type.
    #[error("parameter width mismatch: expected {expected} bytes, got {actual}")]
    WidthMismatch {
        /// Width, or set of widths, the requested type accepts.
        expected: &'static str,
        /// Width the record actually carries.
        actual: usize,
    },

    /// A boolean parameter holds a byte other than 0x00 or 0x01.
    #[error("invalid boolean encoding: {0:#04x}")]
    InvalidBool(u8),

    /// A string parameter is not valid UTF-8.
    #[error("string parameter is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A handshake or record method was called in the wrong session state.
    #[error("invalid session state: {0}")]
    InvalidState(&'static str),

    /// Key material has the wrong flavor or is unusable.
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

impl Error {
    /// Create a new malformed-message error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedMessage(msg.into())
    }

    /// Create a new invalid-key error.
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Error::InvalidKey(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed("client hello truncated");
        assert_eq!(err.to_string(), "malformed message: client hello truncated");

        let err = Error::ReplayOrReorder {
            expected: 4,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "record counter out of sequence: expected 4, got 2"
        );

        let err = Error::WidthMismatch {
            expected: "4",
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "parameter width mismatch: expected 4 bytes, got 2"
        );

        let err = Error::InvalidBool(0x07);
        assert_eq!(err.to_string(), "invalid boolean encoding: 0x07");
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: Error = utf8_err.into();
        assert!(matches!(err, Error::InvalidUtf8(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
