//! WebSocket connection task with reconnection policy.
//!
//! [`run_connection`] owns the socket for the whole life of a
//! [`super::Transport`]. It connects, forwards queued commands, decodes and
//! publishes inbound frames, and reconnects after a drop, announcing it
//! with [`TransportEvent::Disconnected`]. A successful
//! connection resets the attempt counter; when `reconnect_attempts` further
//! attempts fail in a row, it publishes [`TransportEvent::ConnectionError`]
//! and exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::messages::{ClientCommand, TransportEvent, decode_server_message, encode_client_command};
use crate::config::TransportConfig;
use crate::domain::EventBus;
use crate::error::ClientError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a connected session loop returned.
#[derive(Debug)]
enum SessionEnd {
    /// Shutdown was requested or the owning transport is gone.
    Shutdown,
    /// The socket closed or failed; reconnecting may help.
    Dropped(String),
}

/// Runs the connect / serve / reconnect loop until shutdown or until the
/// reconnection budget is exhausted.
pub async fn run_connection(
    config: TransportConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<ClientCommand>,
    events: EventBus<TransportEvent>,
    open: Arc<AtomicBool>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut failures: u32 = 0;

    loop {
        let attempt = tokio::select! {
            result = connect(&config) => result,
            _ = &mut shutdown_rx => {
                tracing::debug!("shutdown while connecting");
                return;
            }
        };

        match attempt {
            Ok(socket) => {
                failures = 0;
                discard_stale_commands(&mut cmd_rx);
                open.store(true, Ordering::Release);
                tracing::info!(url = %config.server_url, "connected to game server");
                events.publish(TransportEvent::Connected);

                let end = serve(socket, &mut cmd_rx, &events, &mut shutdown_rx).await;
                open.store(false, Ordering::Release);

                match end {
                    SessionEnd::Shutdown => {
                        tracing::debug!("connection task shut down");
                        return;
                    }
                    SessionEnd::Dropped(reason) => {
                        tracing::warn!(%reason, "connection lost, reconnecting");
                        events.publish(TransportEvent::Disconnected { reason });
                    }
                }
            }
            Err(err) => {
                failures = failures.saturating_add(1);
                tracing::warn!(
                    code = err.error_code(),
                    error = %err,
                    attempt = failures,
                    "connection attempt failed"
                );
                if !err.is_transient() || failures > config.reconnect_attempts {
                    tracing::error!(error = %err, "giving up on connection");
                    events.publish(TransportEvent::ConnectionError {
                        cause: err.to_string(),
                    });
                    return;
                }
            }
        }

        tokio::select! {
            () = tokio::time::sleep(config.reconnect_delay) => {}
            _ = &mut shutdown_rx => {
                tracing::debug!("shutdown while waiting to reconnect");
                return;
            }
        }
    }
}

/// One bounded connection attempt.
async fn connect(config: &TransportConfig) -> Result<Socket, ClientError> {
    let timeout_ms = u64::try_from(config.connect_timeout.as_millis()).unwrap_or(u64::MAX);
    match tokio::time::timeout(config.connect_timeout, connect_async(config.server_url.as_str()))
        .await
    {
        Ok(Ok((socket, _response))) => Ok(socket),
        Ok(Err(err)) => Err(classify_connect_error(err)),
        Err(_) => Err(ClientError::ConnectTimeout { timeout_ms }),
    }
}

/// URL problems will not fix themselves on retry.
fn classify_connect_error(err: tokio_tungstenite::tungstenite::Error) -> ClientError {
    use tokio_tungstenite::tungstenite::Error;
    match err {
        Error::Url(_) | Error::HttpFormat(_) => ClientError::Config(err.to_string()),
        other => ClientError::from(other),
    }
}

/// Commands queued before the previous connection dropped are stale.
fn discard_stale_commands(cmd_rx: &mut mpsc::UnboundedReceiver<ClientCommand>) {
    let mut discarded = 0_usize;
    while cmd_rx.try_recv().is_ok() {
        discarded = discarded.saturating_add(1);
    }
    if discarded > 0 {
        tracing::debug!(discarded, "discarded commands queued before reconnect");
    }
}

/// Read/write loop for one open socket.
async fn serve(
    socket: Socket,
    cmd_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    events: &EventBus<TransportEvent>,
    shutdown_rx: &mut oneshot::Receiver<()>,
) -> SessionEnd {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Outgoing command from the controller
            cmd = cmd_rx.recv() => {
                let Some(command) = cmd else {
                    let _ = ws_tx.close().await;
                    return SessionEnd::Shutdown;
                };
                match encode_client_command(&command) {
                    Ok(json) => {
                        if let Err(err) = ws_tx.send(Message::text(json)).await {
                            return SessionEnd::Dropped(err.to_string());
                        }
                        tracing::debug!(command = command.event_name(), "sent command");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to encode command");
                    }
                }
            }
            // Incoming frame from the authority
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => handle_text_frame(text.as_str(), events),
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame.map_or_else(
                            || "closed by server".to_string(),
                            |f| format!("closed by server: {}", f.reason.as_str()),
                        );
                        return SessionEnd::Dropped(reason);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return SessionEnd::Dropped(err.to_string()),
                    None => return SessionEnd::Dropped("stream ended".to_string()),
                }
            }
            // Owner asked us to stop
            _ = &mut *shutdown_rx => {
                let _ = ws_tx.close().await;
                return SessionEnd::Shutdown;
            }
        }
    }
}

/// Publishes a validated frame; malformed frames never reach the controller.
fn handle_text_frame(text: &str, events: &EventBus<TransportEvent>) {
    match decode_server_message(text) {
        Ok(event) => {
            tracing::debug!(event = event.event_type_str(), "received event");
            events.publish(event);
        }
        Err(err) => {
            tracing::warn!(
                code = err.error_code(),
                error = %err,
                raw = text,
                "rejected inbound frame"
            );
        }
    }
}
