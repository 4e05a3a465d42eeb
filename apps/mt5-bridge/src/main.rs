//! MT5 Bridge Binary
//!
//! Starts the HTTP bridge to the MetaTrader 5 terminal.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin mt5-bridge
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `MT5_LOGIN`: Trading account number
//! - `MT5_PASSWORD`: Trading account password
//! - `MT5_SERVER`: Trade server name
//!
//! ## Optional
//! - `TERMINAL_MODE`: gateway | paper (default: gateway)
//! - `TERMINAL_GATEWAY_URL`: Terminal gateway URL (default: <http://127.0.0.1:8228>)
//! - `TERMINAL_GATEWAY_TIMEOUT_SECS`: Gateway request timeout (default: 10)
//! - `BRIDGE_HOST` / `BRIDGE_PORT`: Listen address (default: 127.0.0.1:5000)
//! - `BRIDGE_API_KEY`: Required `X-API-Key` value (default: no auth)
//! - `DEFAULT_SYMBOL`: Symbol used when a request names none (default: XAUUSD)
//! - `ORDER_DEVIATION` / `ORDER_MAGIC` / `ORDER_COMMENT`: Order defaults
//! - `CLOSE_ALL_MAGIC`: Magic number of close-all deals (default: 9999)
//! - `FILL_RETRY_DELAY_MS`: Pause between fill modes (default: 500)
//! - `MIN_STOP_DISTANCE_POINTS`: Stop distance floor (default: 10)
//! - `POSITION_SELECTION`: strict | heuristic (default: strict)
//! - `METRICS_PORT`: Prometheus exporter port (default: 0, disabled)
//! - `RUST_LOG`: Log level (default: mt5_bridge=info)

use std::net::SocketAddr;
use std::sync::Arc;

use mt5_bridge::application::ports::TerminalPort;
use mt5_bridge::application::services::{ConnectionManager, TerminalGate};
use mt5_bridge::infrastructure::config::{BridgeConfig, TerminalMode};
use mt5_bridge::infrastructure::http::{AppState, create_router};
use mt5_bridge::infrastructure::terminal::{GatewayConfig, GatewayTerminal, PaperTerminal};
use mt5_bridge::observability::{MetricsConfig, init_metrics};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    init_tracing();

    tracing::info!("Starting MT5 Bridge");

    let config = BridgeConfig::from_env()?;
    log_config(&config);

    if config.server.metrics_port > 0 {
        init_metrics(&MetricsConfig::with_port(config.server.metrics_port))?;
    }

    match config.mode {
        TerminalMode::Gateway => {
            let terminal = GatewayTerminal::new(&GatewayConfig::from(&config.gateway))?;
            serve(&config, Arc::new(terminal)).await
        }
        TerminalMode::Paper => {
            let terminal =
                PaperTerminal::demo(config.credentials.login, &config.credentials.server);
            serve(&config, Arc::new(terminal)).await
        }
    }
}

/// Run the HTTP server until a shutdown signal arrives.
async fn serve<T: TerminalPort + 'static>(
    config: &BridgeConfig,
    terminal: Arc<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = ConnectionManager::new(terminal, config.credentials.clone());
    let gate = Arc::new(TerminalGate::new(manager));

    // Connect eagerly; requests retry on their own if this fails.
    if !gate.lock().await.ensure_connected(true).await {
        tracing::warn!("Terminal not connected at startup, will retry on first request");
    }

    let state = AppState::new(
        Arc::clone(&gate),
        &config.trade,
        config.default_symbol.clone(),
    );
    let app = create_router(state, config.server.api_key.clone());

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /status");
    tracing::info!("  POST /trade");
    tracing::info!("  POST /close_all");

    let shutdown_token = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown_token.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_token.cancelled_owned())
        .await?;

    gate.lock().await.shutdown().await;
    tracing::info!("MT5 Bridge stopped");
    Ok(())
}

fn log_config(config: &BridgeConfig) {
    tracing::info!(
        mode = config.mode.as_str(),
        login = config.credentials.login,
        server = %config.credentials.server,
        gateway = %config.gateway.url,
        default_symbol = %config.default_symbol,
        position_selection = %config.trade.position_selection,
        api_key = config.server.api_key.is_some(),
        "Configuration loaded"
    );
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Initialize the tracing subscriber with environment filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mt5_bridge=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Cancel `token` on SIGTERM or SIGINT.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    token.cancel();
}
