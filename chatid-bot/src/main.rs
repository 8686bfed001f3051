//! Chat ID bot web server.
//!
//! Serves the Telegram webhook on a single route:
//! - `?register` / `?unregister` manage the webhook registration
//! - Any other request is treated as an update delivery
//!
//! The bot authenticates once at startup; a rejected token stops the process.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatid::telegram::BotApi;
use chatid::{router, AppState, Config, TelegramClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        telegram_api_url = %config.telegram_api_url,
        request_timeout_ms = config.request_timeout_ms,
        secret_token_configured = config.webhook_secret_token.is_some(),
        "config_loaded"
    );

    let timeout = Duration::from_millis(config.request_timeout_ms);
    let state = AppState::bootstrap(&config, |settings| {
        let client = TelegramClient::new(&config.telegram_api_url, &settings.bot_token, timeout)?;
        Ok(Arc::new(client) as Arc<dyn BotApi>)
    })
    .await
    .context("Failed to authorize bot")?;

    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "shutdown_signal_received"),
        _ = terminate => info!(signal = "SIGTERM", "shutdown_signal_received"),
    }

    info!("web_server_shutting_down");
}
