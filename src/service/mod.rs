//! Service layer: the session state machine and what it derives.
//!
//! [`SessionController`] interprets transport events, owns the
//! [`super::domain::SessionStore`], and decides which local actions reach
//! the transport. [`Status`] is the derived status line.

pub mod session_controller;
pub mod status;

pub use session_controller::{Dispatch, Notice, PendingRequest, Phase, Rejection, SessionController};
pub use status::Status;
