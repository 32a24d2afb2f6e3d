//! Session controller: the client-side state machine.
//!
//! The controller interprets [`TransportEvent`]s, mutates the
//! [`SessionStore`], decides whether a local action is legal, and issues
//! commands through [`SessionCommands`]. It never touches the socket.
//!
//! ```text
//! Unestablished --request_create / request_join--> Establishing
//! Establishing  --session_created / session_joined--> Playing
//! Establishing  --invalid_session / connection_error--> Unestablished
//! Establishing  --disconnected / connected--> Unestablished
//! Playing       --remote_update(winner)--> Finished
//! ```
//!
//! Every transition runs to completion inside one call on the application
//! loop; there is no internal concurrency. Local input that would be illegal
//! is a silent no-op: nothing is sent and nothing changes. The returned
//! [`Dispatch`] only says what happened.

use std::fmt;

use crate::config::MoveGuard;
use crate::domain::{
    Board, Mark, Outcome, Position, RoomCode, SessionStore, StoreChange, Subscription, WinningLine,
};
use crate::service::status::Status;
use crate::ws::{RemoteUpdate, SessionCommands, TransportEvent};

/// What an establishment request is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    /// A new room was requested.
    Create,
    /// Joining the given room was requested.
    Join(RoomCode),
}

/// Lifecycle phase of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// No session and no request outstanding.
    #[default]
    Unestablished,
    /// A create or join request is outstanding.
    Establishing(PendingRequest),
    /// Established, no winner yet.
    Playing,
    /// Established and the authority declared a winner.
    Finished,
}

impl Phase {
    /// Returns `true` for `Playing` and `Finished`.
    #[must_use]
    pub const fn is_established(&self) -> bool {
        matches!(self, Self::Playing | Self::Finished)
    }

    /// Returns the phase name as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unestablished => "unestablished",
            Self::Establishing(_) => "establishing",
            Self::Playing => "playing",
            Self::Finished => "finished",
        }
    }
}

/// Blocking user-visible message produced by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The authority refused a join.
    SessionRejected,
    /// The transport gave up connecting.
    ConnectionFailed {
        /// Last failure reported by the transport.
        cause: String,
    },
    /// The link dropped while a create or join was outstanding.
    RequestLost,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionRejected => f.write_str("Invalid room code or room is full"),
            Self::ConnectionFailed { cause } => {
                write!(f, "Could not connect to the game server: {cause}")
            }
            Self::RequestLost => {
                f.write_str("Connection lost before the server answered, please try again")
            }
        }
    }
}

/// Why a local action was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The link is not open.
    LinkDown,
    /// A create or join is already outstanding.
    AlreadyPending,
    /// A session is already established.
    AlreadyEstablished,
    /// The join input was blank after trimming.
    BlankRoomCode,
    /// The target cell is taken.
    CellOccupied,
    /// It is the opponent's turn.
    NotYourTurn,
    /// A winner has been declared.
    GameOver,
    /// A move is already awaiting the authority's update.
    MoveInFlight,
    /// No room code is known.
    NoRoom,
}

impl Rejection {
    /// Returns the reason as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinkDown => "link_down",
            Self::AlreadyPending => "already_pending",
            Self::AlreadyEstablished => "already_established",
            Self::BlankRoomCode => "blank_room_code",
            Self::CellOccupied => "cell_occupied",
            Self::NotYourTurn => "not_your_turn",
            Self::GameOver => "game_over",
            Self::MoveInFlight => "move_in_flight",
            Self::NoRoom => "no_room",
        }
    }
}

/// Result of a local action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Dispatch {
    /// A command was handed to the transport.
    Sent,
    /// Nothing was sent and nothing changed.
    Ignored(Rejection),
}

impl Dispatch {
    /// Returns `true` if a command was sent.
    #[must_use]
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Client-side session state machine.
///
/// Owns the only subscription to transport events for its whole lifetime;
/// dropping the controller unsubscribes.
#[derive(Debug)]
pub struct SessionController<C> {
    commands: C,
    events: Subscription<TransportEvent>,
    store: SessionStore,
    board: Board,
    outcome: Outcome,
    phase: Phase,
    link_open: bool,
    move_in_flight: bool,
    move_guard: MoveGuard,
    notice: Option<Notice>,
}

impl<C: SessionCommands> SessionController<C> {
    /// Creates a controller in `Unestablished` with an empty board.
    ///
    /// The link counts as down until the first `Connected` event is
    /// applied.
    #[must_use]
    pub fn new(commands: C, events: Subscription<TransportEvent>, move_guard: MoveGuard) -> Self {
        Self {
            commands,
            events,
            store: SessionStore::default(),
            board: Board::new(),
            outcome: Outcome::default(),
            phase: Phase::Unestablished,
            link_open: false,
            move_in_flight: false,
            move_guard,
            notice: None,
        }
    }

    /// Replaces the session store with one whose change bus holds
    /// `capacity` notifications.
    #[must_use]
    pub fn with_change_capacity(mut self, capacity: usize) -> Self {
        self.store = SessionStore::new(capacity);
        self
    }

    /// Asks the authority for a new room.
    pub fn request_create(&mut self) -> Dispatch {
        if let Some(reason) = self.establishment_gate() {
            return self.ignore("request_create", reason);
        }
        self.phase = Phase::Establishing(PendingRequest::Create);
        self.notice = None;
        self.commands.request_create();
        tracing::info!("requested new session");
        Dispatch::Sent
    }

    /// Asks to join the room named by `input` (trimmed).
    pub fn request_join(&mut self, input: &str) -> Dispatch {
        if let Some(reason) = self.establishment_gate() {
            return self.ignore("request_join", reason);
        }
        let Ok(room_code) = RoomCode::parse(input) else {
            return self.ignore("request_join", Rejection::BlankRoomCode);
        };
        self.commands.request_join(&room_code);
        tracing::info!(room_code = %room_code, "requested to join session");
        self.phase = Phase::Establishing(PendingRequest::Join(room_code));
        self.notice = None;
        Dispatch::Sent
    }

    /// Submits a move at `position` if it is legal right now.
    ///
    /// The board is not changed locally; it changes only when the
    /// authority's update arrives.
    pub fn attempt_move(&mut self, position: Position) -> Dispatch {
        if !self.board.is_empty_at(position) {
            return self.ignore("attempt_move", Rejection::CellOccupied);
        }
        if !self.store.is_my_turn() {
            return self.ignore("attempt_move", Rejection::NotYourTurn);
        }
        if self.outcome.is_decided() {
            return self.ignore("attempt_move", Rejection::GameOver);
        }
        if self.move_in_flight && self.move_guard == MoveGuard::InFlight {
            return self.ignore("attempt_move", Rejection::MoveInFlight);
        }
        let Some(room_code) = self.store.room_code() else {
            return self.ignore("attempt_move", Rejection::NoRoom);
        };

        self.commands.submit_move(room_code, position);
        self.move_in_flight = true;
        tracing::debug!(room_code = %room_code, %position, "submitted move");
        Dispatch::Sent
    }

    /// Applies one inbound transport event.
    pub fn handle_event(&mut self, event: TransportEvent) {
        tracing::debug!(
            event = event.event_type_str(),
            phase = self.phase.as_str(),
            "handling event"
        );
        match event {
            TransportEvent::Connected => self.on_connected(),
            TransportEvent::Disconnected { reason } => self.on_disconnected(reason),
            TransportEvent::ConnectionError { cause } => self.on_connection_error(cause),
            TransportEvent::SessionCreated(room_code) => self.on_session_created(room_code),
            TransportEvent::SessionJoined(symbol) => self.on_session_joined(symbol),
            TransportEvent::RemoteUpdate(update) => self.on_remote_update(update),
            TransportEvent::InvalidSession => self.on_invalid_session(),
        }
    }

    /// Waits for the next transport event without applying it.
    ///
    /// Returns `None` once the transport is gone. Cancel safe.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    /// Waits for the next transport event and applies it.
    ///
    /// Returns `false` once the transport is gone.
    pub async fn pump(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Applies every event already queued, without waiting.
    pub fn drain_pending(&mut self) -> usize {
        let events = self.events.drain();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    fn establishment_gate(&self) -> Option<Rejection> {
        match self.phase {
            Phase::Establishing(_) => Some(Rejection::AlreadyPending),
            Phase::Playing | Phase::Finished => Some(Rejection::AlreadyEstablished),
            Phase::Unestablished if !self.is_link_open() => Some(Rejection::LinkDown),
            Phase::Unestablished => None,
        }
    }

    fn ignore(&self, action: &'static str, reason: Rejection) -> Dispatch {
        tracing::debug!(
            action,
            reason = reason.as_str(),
            phase = self.phase.as_str(),
            "ignored local action"
        );
        Dispatch::Ignored(reason)
    }

    /// Returns `true` while the link is open: the last applied event said
    /// so and the transport still agrees.
    #[must_use]
    pub fn is_link_open(&self) -> bool {
        self.link_open && self.commands.is_open()
    }

    fn unexpected(&self, event: &'static str) {
        tracing::warn!(
            event,
            phase = self.phase.as_str(),
            "event does not apply to current phase, ignoring"
        );
    }

    fn on_connected(&mut self) {
        self.link_open = true;
        self.move_in_flight = false;
        if matches!(self.notice, Some(Notice::ConnectionFailed { .. })) {
            self.notice = None;
        }
        // Requests are only sent on an applied link, so a pending one went
        // out on the previous socket.
        if matches!(self.phase, Phase::Establishing(_)) {
            self.abandon_request("connected");
        }
    }

    fn on_disconnected(&mut self, reason: String) {
        self.link_open = false;
        self.move_in_flight = false;
        tracing::warn!(%reason, phase = self.phase.as_str(), "link lost");
        if matches!(self.phase, Phase::Establishing(_)) {
            self.abandon_request("disconnected");
        }
    }

    fn abandon_request(&mut self, event: &'static str) {
        tracing::info!(event, "pending request lost with the link");
        self.phase = Phase::Unestablished;
        self.notice = Some(Notice::RequestLost);
    }

    fn on_connection_error(&mut self, cause: String) {
        self.link_open = false;
        self.move_in_flight = false;
        if matches!(self.phase, Phase::Establishing(_)) {
            self.phase = Phase::Unestablished;
        }
        tracing::warn!(%cause, phase = self.phase.as_str(), "connection failed");
        self.notice = Some(Notice::ConnectionFailed { cause });
    }

    fn on_session_created(&mut self, room_code: RoomCode) {
        if !matches!(self.phase, Phase::Establishing(_)) {
            self.unexpected("session_created");
            return;
        }
        tracing::info!(room_code = %room_code, symbol = %Mark::X, "session created");
        self.store.establish(room_code, Mark::X, true);
        self.phase = Phase::Playing;
    }

    fn on_session_joined(&mut self, symbol: Mark) {
        let Phase::Establishing(PendingRequest::Join(room_code)) = &self.phase else {
            self.unexpected("session_joined");
            return;
        };
        let room_code = room_code.clone();
        tracing::info!(room_code = %room_code, %symbol, "session joined");
        self.store.establish(room_code, symbol, symbol.moves_first());
        self.phase = Phase::Playing;
    }

    fn on_remote_update(&mut self, update: RemoteUpdate) {
        if !self.phase.is_established() {
            self.unexpected("remote_update");
            return;
        }
        self.board = update.board;
        self.outcome = update.outcome;
        self.move_in_flight = false;
        self.store.set_is_my_turn(!self.store.is_my_turn());
        self.phase = if self.outcome.is_decided() {
            Phase::Finished
        } else {
            Phase::Playing
        };
        tracing::debug!(
            occupied = self.board.occupied_count(),
            is_my_turn = self.store.is_my_turn(),
            phase = self.phase.as_str(),
            "applied remote update"
        );
        if let Some(winner) = self.outcome.winner() {
            tracing::info!(%winner, "game finished");
        }
    }

    fn on_invalid_session(&mut self) {
        if !matches!(self.phase, Phase::Establishing(_)) {
            self.unexpected("invalid_session");
            return;
        }
        tracing::info!("session rejected by server");
        self.phase = Phase::Unestablished;
        self.notice = Some(Notice::SessionRejected);
    }
}

impl<C> SessionController<C> {
    /// Current status line.
    #[must_use]
    pub fn status(&self) -> Status {
        Status::derive(&self.board, &self.outcome, self.store.session())
    }

    /// Last board received from the authority.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Last outcome received from the authority.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Cells to highlight, if a winner was declared.
    #[must_use]
    pub const fn winning_line(&self) -> Option<&WinningLine> {
        self.outcome.winning_line()
    }

    /// Session facts.
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Subscribes to session store changes.
    #[must_use]
    pub fn subscribe_changes(&self) -> Subscription<StoreChange> {
        self.store.subscribe()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns `true` while a create or join is outstanding.
    #[must_use]
    pub const fn is_establishing(&self) -> bool {
        matches!(self.phase, Phase::Establishing(_))
    }

    /// Returns `true` while a submitted move awaits the authority.
    #[must_use]
    pub const fn is_move_in_flight(&self) -> bool {
        self.move_in_flight
    }

    /// Notice waiting to be shown, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Removes and returns the pending notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
