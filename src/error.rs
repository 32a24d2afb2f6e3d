//! Client error types with numeric code mapping.
//!
//! [`ClientError`] is the central error type for the client. Local input
//! rejections (blank join code, illegal cell activation) are *not* errors:
//! the controller ignores them silently. Everything here is either a value
//! that failed validation, a payload the authority sent in the wrong shape,
//! or a transport failure.

/// Client-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category   |
/// |-----------|------------|
/// | 1000–1999 | Validation |
/// | 2000–2999 | Protocol   |
/// | 3000–3999 | Transport  |
/// | 4000–4999 | Local      |
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Room code was empty after trimming.
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),

    /// Board index outside `0..=8`.
    #[error("invalid position: {0}")]
    InvalidPosition(usize),

    /// Inbound message did not match the expected schema.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// WebSocket connect or I/O failure.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A single connection attempt exceeded the configured timeout.
    #[error("connection timed out after {timeout_ms} ms")]
    ConnectTimeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// Configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Terminal I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRoomCode(_) => 1001,
            Self::InvalidPosition(_) => 1002,
            Self::MalformedPayload(_) => 2001,
            Self::Connection(_) => 3001,
            Self::ConnectTimeout { .. } => 3002,
            Self::Config(_) => 4001,
            Self::Io(_) => 4002,
        }
    }

    /// Returns `true` if another connection attempt may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ConnectTimeout { .. })
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_ranges() {
        assert_eq!(ClientError::InvalidRoomCode(String::new()).error_code(), 1001);
        assert_eq!(ClientError::InvalidPosition(9).error_code(), 1002);
        assert_eq!(ClientError::MalformedPayload("x".into()).error_code(), 2001);
        assert_eq!(ClientError::Connection("x".into()).error_code(), 3001);
        assert_eq!(ClientError::ConnectTimeout { timeout_ms: 1 }.error_code(), 3002);
        assert_eq!(ClientError::Config("x".into()).error_code(), 4001);
    }

    #[test]
    fn only_transport_errors_are_transient() {
        assert!(ClientError::Connection("refused".into()).is_transient());
        assert!(ClientError::ConnectTimeout { timeout_ms: 10 }.is_transient());
        assert!(!ClientError::MalformedPayload("x".into()).is_transient());
        assert!(!ClientError::Config("x".into()).is_transient());
    }

    #[test]
    fn json_errors_become_malformed_payloads() {
        let err = serde_json::from_str::<u8>("nope").map_err(ClientError::from);
        assert!(matches!(err, Err(ClientError::MalformedPayload(_))));
    }

    #[test]
    fn display_includes_detail() {
        let err = ClientError::ConnectTimeout { timeout_ms: 10_000 };
        assert_eq!(err.to_string(), "connection timed out after 10000 ms");
    }
}
