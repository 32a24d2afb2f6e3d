//! # tictactoe-client
//!
//! Terminal client for two-player tic-tac-toe played against a remote game
//! server over WebSocket.
//!
//! The server is the sole authority on the board, turn order and outcome.
//! This crate keeps the client-side session: it creates or joins a room,
//! tracks whose turn it is, applies the server's board updates, and refuses
//! illegal local moves before they are sent.
//!
//! ## Architecture
//!
//! ```text
//! Terminal (stdin / stdout)
//!     │
//!     ├── BoardView, Intent (view/)
//!     │
//!     ├── SessionController (service/)
//!     ├── SessionStore, EventBus (domain/)
//!     │
//!     ├── Transport (ws/)
//!     │
//!     └── Game server (WebSocket)
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod view;
pub mod ws;
