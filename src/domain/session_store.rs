//! Session identity with change notification.
//!
//! [`SessionStore`] holds the three facts that identify this client's seat
//! in a session: the room code, the assigned symbol and whether it is this
//! client's turn. It is owned by the session controller (the single writer)
//! and lent out read-only to the presentation layer, which listens for
//! [`StoreChange`]s to know when to re-render.
//!
//! # Invariants
//!
//! - The room code and the symbol are either both absent or both present.
//!   [`SessionStore::establish`] is the only way to set them together.
//! - Before establishment, `is_my_turn` is `false`.

use chrono::Utc;

use super::event_bus::{EventBus, Subscription};
use crate::config::DEFAULT_EVENT_BUS_CAPACITY;
use super::session_event::StoreChange;
use super::{Mark, RoomCode};

/// Snapshot of the session identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Room identifier, set once on establishment.
    pub room_code: Option<RoomCode>,
    /// Symbol assigned by the authority, set once on establishment.
    pub player_symbol: Option<Mark>,
    /// Whether this client moves next.
    pub is_my_turn: bool,
}

impl Session {
    /// Returns `true` once both the room code and the symbol are known.
    #[must_use]
    pub const fn is_established(&self) -> bool {
        self.room_code.is_some() && self.player_symbol.is_some()
    }
}

/// Observable holder of the current [`Session`].
#[derive(Debug)]
pub struct SessionStore {
    session: Session,
    changes: EventBus<StoreChange>,
}

impl SessionStore {
    /// Creates an empty store whose change bus holds `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            session: Session::default(),
            changes: EventBus::new(capacity),
        }
    }

    /// Current session snapshot.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Room code, if established.
    #[must_use]
    pub const fn room_code(&self) -> Option<&RoomCode> {
        self.session.room_code.as_ref()
    }

    /// Assigned symbol, if established.
    #[must_use]
    pub const fn player_symbol(&self) -> Option<Mark> {
        self.session.player_symbol
    }

    /// Whether this client moves next.
    #[must_use]
    pub const fn is_my_turn(&self) -> bool {
        self.session.is_my_turn
    }

    /// Returns `true` once both the room code and the symbol are known.
    #[must_use]
    pub const fn is_established(&self) -> bool {
        self.session.is_established()
    }

    /// Subscribes to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<StoreChange> {
        self.changes.subscribe()
    }

    /// Sets room code, symbol and turn flag as one logical update.
    pub fn establish(&mut self, room_code: RoomCode, player_symbol: Mark, is_my_turn: bool) {
        self.session = Session {
            room_code: Some(room_code.clone()),
            player_symbol: Some(player_symbol),
            is_my_turn,
        };
        self.changes.publish(StoreChange::Established {
            room_code,
            player_symbol,
            is_my_turn,
            timestamp: Utc::now(),
        });
    }

    /// Replaces the room code.
    ///
    /// Callers are responsible for pairing this with
    /// [`Self::set_player_symbol`]; prefer [`Self::establish`].
    pub fn set_room_code(&mut self, room_code: Option<RoomCode>) {
        self.session.room_code.clone_from(&room_code);
        self.changes.publish(StoreChange::RoomCode {
            room_code,
            timestamp: Utc::now(),
        });
    }

    /// Replaces the player symbol.
    pub fn set_player_symbol(&mut self, player_symbol: Option<Mark>) {
        self.session.player_symbol = player_symbol;
        self.changes.publish(StoreChange::PlayerSymbol {
            player_symbol,
            timestamp: Utc::now(),
        });
    }

    /// Replaces the turn flag.
    pub fn set_is_my_turn(&mut self, is_my_turn: bool) {
        self.session.is_my_turn = is_my_turn;
        self.changes.publish(StoreChange::Turn {
            is_my_turn,
            timestamp: Utc::now(),
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUS_CAPACITY)
    }
}
