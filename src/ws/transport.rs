//! Transport adapter: the client's only handle on the connection.
//!
//! [`Transport::start`] spawns the connection task (see
//! [`super::connection`]) and returns the owning handle plus the first
//! [`Subscription`] to inbound events, created before the task can publish
//! anything so no early `Connected` is lost.
//!
//! Commands go out through [`TransportHandle`], a cheap clone that
//! implements [`SessionCommands`]. Every command is dropped on the floor
//! while the link is down; nothing is queued for later.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::connection::run_connection;
use super::messages::{ClientCommand, MovePayload, TransportEvent};
use crate::config::TransportConfig;
use crate::domain::{EventBus, Position, RoomCode, Subscription};

/// The three commands the session controller may issue, plus the live
/// link state that gates them.
///
/// Commands are fire-and-forget: no return value, no acknowledgment
/// tracking.
pub trait SessionCommands {
    /// Returns `true` while commands can reach the authority.
    fn is_open(&self) -> bool;

    /// Ask the authority for a new room.
    fn request_create(&self);

    /// Ask to join `room_code`.
    fn request_join(&self, room_code: &RoomCode);

    /// Submit a move for `room_code`.
    fn submit_move(&self, room_code: &RoomCode, position: Position);
}

/// Cloneable sending side of the transport.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    cmd_tx: mpsc::UnboundedSender<ClientCommand>,
    open: Arc<AtomicBool>,
}

impl TransportHandle {
    fn send(&self, command: ClientCommand) {
        if !self.is_open() {
            tracing::debug!(command = command.event_name(), "link down, dropping command");
            return;
        }
        let name = command.event_name();
        if self.cmd_tx.send(command).is_err() {
            tracing::debug!(command = name, "connection task gone, dropping command");
        } else {
            tracing::debug!(command = name, "queued command");
        }
    }
}

impl SessionCommands for TransportHandle {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn request_create(&self) {
        self.send(ClientCommand::CreateRoom);
    }

    fn request_join(&self, room_code: &RoomCode) {
        self.send(ClientCommand::JoinRoom(room_code.clone()));
    }

    fn submit_move(&self, room_code: &RoomCode, position: Position) {
        self.send(ClientCommand::MakeMove(MovePayload {
            room_code: room_code.clone(),
            position,
        }));
    }
}

/// Owner of the connection task.
///
/// Dropping it aborts the task; [`Transport::shutdown`] closes the socket
/// gracefully first.
#[derive(Debug)]
pub struct Transport {
    handle: TransportHandle,
    task: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    shutdown_timeout: Duration,
}

impl Transport {
    /// Spawns the connection task and returns the transport together with
    /// a subscription to its events.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use = "the subscription is the only way to see transport events"]
    pub fn start(config: TransportConfig) -> (Self, Subscription<TransportEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let open = Arc::new(AtomicBool::new(false));
        let events = EventBus::new(config.event_bus_capacity);
        let subscription = events.subscribe();

        let shutdown_timeout = config.shutdown_timeout;
        let task = tokio::spawn(run_connection(
            config,
            cmd_rx,
            events,
            Arc::clone(&open),
            shutdown_rx,
        ));

        let transport = Self {
            handle: TransportHandle { cmd_tx, open },
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
            shutdown_timeout,
        };
        (transport, subscription)
    }

    /// Returns a cloneable command handle.
    #[must_use]
    pub fn handle(&self) -> TransportHandle {
        self.handle.clone()
    }

    /// Returns `true` while the connection is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Stops the connection task, closing the socket if one is open.
    ///
    /// Waits up to the configured shutdown timeout, then aborts.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(self.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    tracing::warn!(error = %join_err, "connection task ended abnormally");
                }
                Err(_) => {
                    tracing::warn!("connection task did not exit in time; aborting");
                    task.abort();
                }
            }
        }

        self.handle.open.store(false, Ordering::Release);
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
