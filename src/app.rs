//! Terminal application loop.
//!
//! Owns the current [`Transport`] and [`SessionController`] and drives both
//! from one `select!` loop over input lines and transport events. A `new`
//! gesture tears the pair down and starts over with a fresh connection.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ClientConfig;
use crate::domain::{StoreChange, Subscription};
use crate::error::ClientError;
use crate::service::{Dispatch, SessionController};
use crate::view::{BoardView, HELP, InputError, Intent};
use crate::ws::{Transport, TransportHandle};

/// What the loop should do after an input line.
enum Flow {
    Continue,
    Restart,
    Quit,
}

/// One transport plus the controller listening to it.
#[derive(Debug)]
struct ActiveSession {
    transport: Transport,
    controller: SessionController<TransportHandle>,
    changes: Subscription<StoreChange>,
}

impl ActiveSession {
    fn start(config: &ClientConfig) -> Self {
        let (transport, events) = Transport::start(config.transport.clone());
        let controller = SessionController::new(transport.handle(), events, config.move_guard)
            .with_change_capacity(config.transport.event_bus_capacity);
        let changes = controller.subscribe_changes();
        tracing::info!(url = %config.transport.server_url, "session started");
        Self {
            transport,
            controller,
            changes,
        }
    }

    fn log_changes(&mut self) {
        for change in self.changes.drain() {
            let detail = serde_json::to_string(&change).unwrap_or_default();
            tracing::debug!(change = change.change_type_str(), %detail, "session store changed");
        }
    }

    async fn shutdown(self) {
        let Self {
            mut transport,
            controller,
            changes,
        } = self;
        drop(changes);
        drop(controller);
        transport.shutdown().await;
        tracing::info!("session closed");
    }
}

/// Runs the client until `quit` or end of input.
///
/// # Errors
///
/// Returns [`ClientError::Io`] if reading input or writing output fails.
pub async fn run<R, W>(config: ClientConfig, input: R, mut output: W) -> Result<(), ClientError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut session = ActiveSession::start(&config);
    write_out(&mut output, "Type 'help' for commands.").await?;
    render(&mut output, &session.controller).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("input closed");
                    break;
                };
                match handle_line(&line, &mut session, &mut output).await? {
                    Flow::Continue => {}
                    Flow::Restart => {
                        session.shutdown().await;
                        session = ActiveSession::start(&config);
                        write_out(&mut output, "Starting over.").await?;
                        render(&mut output, &session.controller).await?;
                    }
                    Flow::Quit => break,
                }
            }
            event = session.controller.next_event() => {
                let Some(event) = event else {
                    tracing::warn!("transport event stream closed");
                    break;
                };
                session.controller.handle_event(event);
                session.log_changes();
                render(&mut output, &session.controller).await?;
            }
        }
    }

    session.shutdown().await;
    Ok(())
}

async fn handle_line<W>(
    line: &str,
    session: &mut ActiveSession,
    output: &mut W,
) -> Result<Flow, ClientError>
where
    W: AsyncWrite + Unpin,
{
    let intent = match Intent::parse(line) {
        Ok(intent) => intent,
        Err(InputError::Empty) => return Ok(Flow::Continue),
        Err(err) => {
            write_out(output, &err.to_string()).await?;
            return Ok(Flow::Continue);
        }
    };

    let controller = &mut session.controller;
    match intent {
        Intent::Create => {
            if controller.request_create() == Dispatch::Sent {
                write_out(output, "Creating room...").await?;
            }
        }
        Intent::Join(code) => {
            if controller.request_join(&code) == Dispatch::Sent {
                write_out(output, &format!("Joining room {}...", code.trim())).await?;
            }
        }
        Intent::Move(position) => {
            let _ = controller.attempt_move(position);
        }
        Intent::Copy => match controller.store().room_code() {
            Some(code) => write_out(output, code.as_str()).await?,
            None => write_out(output, "No room yet.").await?,
        },
        Intent::Help => write_out(output, HELP).await?,
        Intent::New => return Ok(Flow::Restart),
        Intent::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

async fn render<W>(
    output: &mut W,
    controller: &SessionController<TransportHandle>,
) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    let view = BoardView::of(controller);
    let mut frame = format!("\n{view}\n");
    if view.status.is_game_over() {
        frame.push_str("Type 'new' to play again.\n");
    }
    if let Some(notice) = controller.notice() {
        frame.push_str(&format!("\n!! {notice}\n"));
    }
    output.write_all(frame.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

async fn write_out<W>(output: &mut W, text: &str) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
