//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable               | Default                    |
//! |------------------------|----------------------------|
//! | `SERVER_URL`           | `ws://127.0.0.1:3000/ws`   |
//! | `RECONNECT_ATTEMPTS`   | `5`                        |
//! | `RECONNECT_DELAY_MS`   | `1000`                     |
//! | `CONNECT_TIMEOUT_MS`   | `10000`                    |
//! | `SHUTDOWN_TIMEOUT_MS`  | `1000`                     |
//! | `EVENT_BUS_CAPACITY`   | `256`                      |
//! | `MOVE_IN_FLIGHT_GUARD` | `true`                     |

use std::time::Duration;

use crate::error::ClientError;

/// Default authority endpoint.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:3000/ws";

/// Default number of automatic reconnection attempts.
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;

/// Default delay between reconnection attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1_000);

/// Default bound on a single connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default grace period for the connection task to exit on shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(1_000);

/// Default capacity of the transport event bus and the session change bus.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;

/// How the controller treats a second move submitted before the authority
/// has answered the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveGuard {
    /// Refuse further submissions until the next remote update arrives.
    #[default]
    InFlight,
    /// Only the turn flag gates moves, so a fast double activation sends
    /// two commands.
    Unguarded,
}

/// Reconnection and timeout settings for the transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// WebSocket URL of the authority (`ws://` or `wss://`).
    pub server_url: String,
    /// Automatic reconnection attempts after the initial one.
    pub reconnect_attempts: u32,
    /// Fixed delay between attempts.
    pub reconnect_delay: Duration,
    /// Bound on a single connection attempt.
    pub connect_timeout: Duration,
    /// How long [`crate::ws::Transport::shutdown`] waits before aborting.
    pub shutdown_timeout: Duration,
    /// Capacity of the inbound event bus; the app sizes the session change
    /// bus the same way.
    pub event_bus_capacity: usize,
}

impl TransportConfig {
    /// Creates a transport configuration for `server_url` with default
    /// timings.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }

    /// Sets the number of reconnection attempts.
    #[must_use]
    pub const fn with_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.reconnect_attempts = attempts;
        self
    }

    /// Sets the delay between reconnection attempts.
    #[must_use]
    pub const fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the per-attempt connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Transport settings.
    pub transport: TransportConfig,
    /// Double-submit policy for the controller.
    pub move_guard: MoveGuard,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `SERVER_URL` is not a `ws://` or
    /// `wss://` URL.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let server_url =
            std::env::var("SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        validate_server_url(&server_url)?;

        let transport = TransportConfig {
            server_url,
            reconnect_attempts: parse_env("RECONNECT_ATTEMPTS", DEFAULT_RECONNECT_ATTEMPTS),
            reconnect_delay: Duration::from_millis(parse_env("RECONNECT_DELAY_MS", 1_000)),
            connect_timeout: Duration::from_millis(parse_env("CONNECT_TIMEOUT_MS", 10_000)),
            shutdown_timeout: Duration::from_millis(parse_env("SHUTDOWN_TIMEOUT_MS", 1_000)),
            event_bus_capacity: parse_env("EVENT_BUS_CAPACITY", DEFAULT_EVENT_BUS_CAPACITY),
        };

        let move_guard = if parse_env_bool("MOVE_IN_FLIGHT_GUARD", true) {
            MoveGuard::InFlight
        } else {
            MoveGuard::Unguarded
        };

        Ok(Self {
            transport,
            move_guard,
        })
    }
}

/// Checks that `url` uses a WebSocket scheme and has something after it.
///
/// # Errors
///
/// Returns [`ClientError::Config`] otherwise.
pub fn validate_server_url(url: &str) -> Result<(), ClientError> {
    let rest = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .ok_or_else(|| {
            ClientError::Config(format!("SERVER_URL must be ws:// or wss://, got {url}"))
        })?;
    if rest.is_empty() {
        return Err(ClientError::Config("SERVER_URL has no host".to_string()));
    }
    Ok(())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
