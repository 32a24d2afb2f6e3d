//! tictactoe-client entry point.
//!
//! Connects to the game server and plays in the terminal: the board goes
//! to stdout, logs go to stderr.

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use tictactoe_client::app;
use tictactoe_client::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }

    // TLS for wss:// endpoints
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        tracing::debug!("TLS crypto provider already installed");
    }

    // Load configuration
    let config = ClientConfig::from_env()?;
    tracing::info!(
        url = %config.transport.server_url,
        move_guard = ?config.move_guard,
        "starting tictactoe-client"
    );

    let input = BufReader::new(tokio::io::stdin());
    app::run(config, input, tokio::io::stdout()).await?;

    tracing::info!("bye");
    Ok(())
}
