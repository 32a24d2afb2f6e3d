//! Domain layer: board model, session identity, and notification plumbing.
//!
//! This module contains the client-side domain model: marks and positions,
//! the cached board and outcome reported by the authority, the room code,
//! the observable session store, and the event bus that carries both
//! transport events and store changes.

pub mod board;
pub mod event_bus;
pub mod mark;
pub mod position;
pub mod room_code;
pub mod session_event;
pub mod session_store;

pub use board::{Board, Outcome, WinningLine};
pub use event_bus::{EventBus, Subscription};
pub use mark::{Cell, Mark};
pub use position::{CELL_COUNT, Position};
pub use room_code::RoomCode;
pub use session_event::StoreChange;
pub use session_store::{Session, SessionStore};
