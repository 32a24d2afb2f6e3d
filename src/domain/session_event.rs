//! Change notifications emitted by the session store.
//!
//! Every store mutation publishes a [`StoreChange`] through the store's
//! [`super::EventBus`]. The presentation layer listens to re-render, and the
//! terminal app logs them at `debug`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Mark, RoomCode};

/// Notification describing one logical update of the session store.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum StoreChange {
    /// Room code replaced on its own.
    RoomCode {
        /// New value.
        room_code: Option<RoomCode>,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },

    /// Player symbol replaced on its own.
    PlayerSymbol {
        /// New value.
        player_symbol: Option<Mark>,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },

    /// Turn flag replaced.
    Turn {
        /// New value.
        is_my_turn: bool,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },

    /// Room code, symbol and turn flag set together.
    Established {
        /// Room the session lives in.
        room_code: RoomCode,
        /// Symbol assigned to this client.
        player_symbol: Mark,
        /// Whether this client moves next.
        is_my_turn: bool,
        /// Time of the change.
        timestamp: DateTime<Utc>,
    },
}

impl StoreChange {
    /// Returns the change kind as a static string slice.
    #[must_use]
    pub const fn change_type_str(&self) -> &'static str {
        match self {
            Self::RoomCode { .. } => "room_code",
            Self::PlayerSymbol { .. } => "player_symbol",
            Self::Turn { .. } => "turn",
            Self::Established { .. } => "established",
        }
    }

    /// Returns when the change happened.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::RoomCode { timestamp, .. }
            | Self::PlayerSymbol { timestamp, .. }
            | Self::Turn { timestamp, .. }
            | Self::Established { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn established_serializes_with_tag() {
        let Ok(room_code) = RoomCode::parse("AB12") else {
            panic!("valid code");
        };
        let change = StoreChange::Established {
            room_code,
            player_symbol: Mark::X,
            is_my_turn: true,
            timestamp: Utc::now(),
        };
        assert_eq!(change.change_type_str(), "established");
        let json = serde_json::to_string(&change).unwrap_or_default();
        assert!(json.contains("\"change\":\"established\""));
        assert!(json.contains("\"room_code\":\"AB12\""));
        assert!(json.contains("\"player_symbol\":\"X\""));
    }

    #[test]
    fn timestamp_accessor() {
        let now = Utc::now();
        let change = StoreChange::Turn {
            is_my_turn: false,
            timestamp: now,
        };
        assert_eq!(change.timestamp(), now);
    }
}
