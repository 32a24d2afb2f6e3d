//! In-process game server for integration tests.
//!
//! Speaks the same JSON frames as the real server: hands out room codes,
//! seats X and O, enforces turn order, and broadcasts `gameUpdate` to both
//! seats after each accepted move.

#![allow(dead_code, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::{Mutex, broadcast, mpsc};

use tictactoe_client::config::{MoveGuard, TransportConfig};
use tictactoe_client::service::SessionController;
use tictactoe_client::ws::{SessionCommands, Transport, TransportHandle};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug)]
struct Room {
    board: [Option<&'static str>; 9],
    turn: &'static str,
    seats: Vec<mpsc::UnboundedSender<String>>,
    winner: Option<&'static str>,
}

impl Room {
    fn winning_line(&self) -> Option<[usize; 3]> {
        LINES.into_iter().find(|line| {
            let [a, b, c] = line.map(|i| self.board.get(i).copied().flatten());
            a.is_some() && a == b && b == c
        })
    }

    fn update_frame(&self) -> String {
        let line = self.winning_line();
        json!({
            "event": "gameUpdate",
            "data": {
                "board": self.board,
                "winner": self.winner,
                "winningLine": line,
            }
        })
        .to_string()
    }
}

/// Shared server state.
#[derive(Debug, Clone)]
pub struct Authority {
    rooms: Arc<Mutex<HashMap<String, Room>>>,
    next_room: Arc<AtomicUsize>,
    moves_received: Arc<AtomicUsize>,
    kick: broadcast::Sender<()>,
}

impl Authority {
    fn new() -> Self {
        Self {
            rooms: Arc::default(),
            next_room: Arc::default(),
            moves_received: Arc::default(),
            kick: broadcast::channel(4).0,
        }
    }

    /// Number of `makeMove` frames received so far, accepted or not.
    pub fn moves_received(&self) -> usize {
        self.moves_received.load(Ordering::SeqCst)
    }

    /// Closes every open client socket.
    pub fn kick_all(&self) {
        let _ = self.kick.send(());
    }

    async fn handle_frame(
        &self,
        text: &str,
        seat: &mut Option<(String, &'static str)>,
        out: &mpsc::UnboundedSender<String>,
    ) {
        let Ok(frame) = serde_json::from_str::<Value>(text) else {
            return;
        };
        let event = frame.get("event").and_then(Value::as_str).unwrap_or_default();
        let data = frame.get("data");
        let mut rooms = self.rooms.lock().await;

        match event {
            "createRoom" => {
                let n = self.next_room.fetch_add(1, Ordering::SeqCst);
                let code = format!("R{n:03}");
                rooms.insert(
                    code.clone(),
                    Room {
                        board: [None; 9],
                        turn: "X",
                        seats: vec![out.clone()],
                        winner: None,
                    },
                );
                *seat = Some((code.clone(), "X"));
                let _ = out.send(json!({"event": "roomCreated", "data": code}).to_string());
            }
            "joinRoom" => {
                let code = data.and_then(Value::as_str).unwrap_or_default().to_string();
                match rooms.get_mut(&code) {
                    Some(room) if room.seats.len() == 1 => {
                        room.seats.push(out.clone());
                        *seat = Some((code, "O"));
                        let _ = out.send(json!({"event": "joinedRoom", "data": "O"}).to_string());
                    }
                    _ => {
                        let _ = out.send(json!({"event": "invalidRoom"}).to_string());
                    }
                }
            }
            "makeMove" => {
                self.moves_received.fetch_add(1, Ordering::SeqCst);
                let Some((code, mark)) = seat.as_ref() else {
                    return;
                };
                let position = data
                    .and_then(|d| d.get("position"))
                    .and_then(Value::as_u64)
                    .and_then(|p| usize::try_from(p).ok());
                let Some(room) = rooms.get_mut(code) else {
                    return;
                };
                let Some(position) = position else {
                    return;
                };
                if room.winner.is_some() || room.turn != *mark {
                    return;
                }
                let Some(cell) = room.board.get_mut(position) else {
                    return;
                };
                if cell.is_some() {
                    return;
                }
                *cell = Some(*mark);
                room.turn = if *mark == "X" { "O" } else { "X" };
                if room.winning_line().is_some() {
                    room.winner = Some(*mark);
                }
                let frame = room.update_frame();
                for seat_tx in &room.seats {
                    let _ = seat_tx.send(frame.clone());
                }
            }
            _ => {}
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(authority): State<Authority>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve(socket, authority))
}

async fn serve(socket: WebSocket, authority: Authority) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let mut kicked = authority.kick.subscribe();
    let mut seat = None;

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        authority.handle_frame(text.as_str(), &mut seat, &out_tx).await;
                    }
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            Some(text) = out_rx.recv() => {
                if ws_tx.send(Message::text(text)).await.is_err() {
                    break;
                }
            }
            _ = kicked.recv() => {
                let _ = ws_tx.close().await;
                break;
            }
        }
    }
}

/// Starts the server on an ephemeral port and returns its `ws://` URL.
pub async fn spawn_authority() -> (String, Authority) {
    let authority = Authority::new();
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(authority.clone());

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no local address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("ws://{addr}/ws"), authority)
}

/// Transport settings tuned for fast tests.
pub fn test_config(url: &str) -> TransportConfig {
    TransportConfig::new(url)
        .with_reconnect_attempts(3)
        .with_reconnect_delay(Duration::from_millis(20))
        .with_connect_timeout(Duration::from_secs(2))
}

/// One connected client.
#[derive(Debug)]
pub struct Client {
    pub transport: Transport,
    pub controller: SessionController<TransportHandle>,
}

/// Starts a client and waits until its link is open.
pub async fn connect_client(url: &str, guard: MoveGuard) -> Client {
    let (transport, events) = Transport::start(test_config(url));
    let mut controller = SessionController::new(transport.handle(), events, guard);
    pump_until(&mut controller, SessionController::is_link_open).await;
    Client {
        transport,
        controller,
    }
}

/// Applies transport events until `done` holds, failing after five seconds.
pub async fn pump_until<C, F>(controller: &mut SessionController<C>, done: F)
where
    C: SessionCommands,
    F: Fn(&SessionController<C>) -> bool,
{
    let reached = tokio::time::timeout(Duration::from_secs(5), async {
        while !done(&*controller) {
            if !controller.pump().await {
                return false;
            }
        }
        true
    })
    .await;
    assert!(matches!(reached, Ok(true)), "condition not reached in time");
}
