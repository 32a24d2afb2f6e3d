//! WebSocket message types: outbound commands, inbound events, and the
//! schema validation between raw frames and domain values.
//!
//! Every frame is a JSON object adjacently tagged as
//! `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::domain::{Board, Mark, Outcome, Position, RoomCode, WinningLine};
use crate::error::ClientError;

/// Commands the client sends to the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientCommand {
    /// Open a new room; the creator plays X.
    CreateRoom,
    /// Join an existing room by code.
    JoinRoom(RoomCode),
    /// Place this client's mark.
    MakeMove(MovePayload),
}

impl ClientCommand {
    /// Returns the wire event name.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::CreateRoom => "createRoom",
            Self::JoinRoom(_) => "joinRoom",
            Self::MakeMove(_) => "makeMove",
        }
    }
}

/// Payload of a `makeMove` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    /// Room the move belongs to.
    pub room_code: RoomCode,
    /// Cell to occupy.
    pub position: Position,
}

/// Board state pushed by the authority after every accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteUpdate {
    /// Full replacement board.
    pub board: Board,
    /// Winner and highlight, if any.
    pub outcome: Outcome,
}

/// Everything the transport can deliver to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is open (first connect or reconnect alike).
    Connected,
    /// An open link dropped; the transport is reconnecting.
    Disconnected {
        /// Why the socket closed.
        reason: String,
    },
    /// Connecting failed and the reconnection budget is spent.
    ConnectionError {
        /// Human-readable cause of the last failure.
        cause: String,
    },
    /// A room was created for this client.
    SessionCreated(RoomCode),
    /// This client joined a room with the given symbol.
    SessionJoined(Mark),
    /// New board state.
    RemoteUpdate(RemoteUpdate),
    /// The requested room does not exist or is full.
    InvalidSession,
}

impl TransportEvent {
    /// Returns the event kind as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected { .. } => "disconnected",
            Self::ConnectionError { .. } => "connection_error",
            Self::SessionCreated(_) => "session_created",
            Self::SessionJoined(_) => "session_joined",
            Self::RemoteUpdate(_) => "remote_update",
            Self::InvalidSession => "invalid_session",
        }
    }
}

/// Frames as they arrive, before validation.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
enum ServerMessage {
    RoomCreated(RoomCode),
    JoinedRoom(Mark),
    GameUpdate(WireUpdate),
    InvalidRoom,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUpdate {
    board: Vec<Option<Mark>>,
    #[serde(default)]
    winner: Option<Mark>,
    #[serde(default)]
    winning_line: Option<Vec<usize>>,
}

impl TryFrom<WireUpdate> for RemoteUpdate {
    type Error = ClientError;

    fn try_from(wire: WireUpdate) -> Result<Self, Self::Error> {
        let board = Board::try_from(wire.board)?;
        let winning_line = wire
            .winning_line
            .filter(|_| wire.winner.is_some())
            .map(WinningLine::try_from)
            .transpose()?;
        Ok(Self {
            board,
            outcome: Outcome::new(wire.winner, winning_line),
        })
    }
}

/// Decodes and validates one inbound text frame.
///
/// # Errors
///
/// Returns [`ClientError::MalformedPayload`] if the frame is not valid
/// JSON, names an unknown event, or carries a payload of the wrong shape
/// (board not nine cells, winning line not three distinct in-range
/// positions, blank room code, unknown symbol).
pub fn decode_server_message(text: &str) -> Result<TransportEvent, ClientError> {
    let message: ServerMessage = serde_json::from_str(text)?;
    let event = match message {
        ServerMessage::RoomCreated(code) => TransportEvent::SessionCreated(code),
        ServerMessage::JoinedRoom(mark) => TransportEvent::SessionJoined(mark),
        ServerMessage::GameUpdate(wire) => TransportEvent::RemoteUpdate(wire.try_into()?),
        ServerMessage::InvalidRoom => TransportEvent::InvalidSession,
    };
    Ok(event)
}

/// Encodes a command as a text frame.
///
/// # Errors
///
/// Returns [`ClientError::MalformedPayload`] if serialization fails.
pub fn encode_client_command(command: &ClientCommand) -> Result<String, ClientError> {
    Ok(serde_json::to_string(command)?)
}
