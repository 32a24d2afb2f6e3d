//! Type-safe room identifier.
//!
//! [`RoomCode`] wraps the code the authority hands out when a session is
//! created. Construction trims surrounding whitespace and refuses blank
//! input, so a `RoomCode` value is always something worth sending.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Identifier of a two-player session on the authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Parses user or wire input into a room code.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRoomCode`] if `input` is empty or only
    /// whitespace.
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidRoomCode(input.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn trims_input() {
        let Ok(code) = RoomCode::parse("  AB12\n") else {
            panic!("code with padding should parse");
        };
        assert_eq!(code.as_str(), "AB12");
        assert_eq!(code.to_string(), "AB12");
    }

    #[test]
    fn rejects_blank() {
        assert!(RoomCode::parse("").is_err());
        assert!(RoomCode::parse(" \t ").is_err());
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<RoomCode>("\"   \"").is_err());
        let Ok(code) = serde_json::from_str::<RoomCode>("\"XY99\"") else {
            panic!("valid code should deserialize");
        };
        assert_eq!(code.as_str(), "XY99");
    }
}
