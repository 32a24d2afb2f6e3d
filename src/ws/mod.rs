//! WebSocket layer: wire messages, the connection task, and the transport
//! adapter the session controller talks to.
//!
//! The controller never touches the socket. It sends commands through
//! [`SessionCommands`] and learns about the outside world only through
//! [`TransportEvent`]s.

pub mod connection;
pub mod messages;
pub mod transport;

pub use messages::{ClientCommand, MovePayload, RemoteUpdate, TransportEvent};
pub use transport::{SessionCommands, Transport, TransportHandle};
