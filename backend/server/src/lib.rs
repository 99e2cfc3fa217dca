//! Backend for the sweepstakes entries dashboard.
//!
//!
//!
//! # General Infrastructure
//! - Entries live in a Google Sheet, one row per entry: `HolderAddress`, `TokenId`, `Quantity`
//! - This server is a read-through proxy in front of it, nothing is stored
//! - Each request signs a service account assertion, gets a read-only token, reads the range once
//! - The header row is dropped when its first cell is the sentinel, everything else passes through
//! - The `watch` binary in the dashboard crate is the client
//!
//!
//!
//! # Routes
//! - `GET /` and `GET /api/sweepstakes`: rows as `string[][]`
//! - `GET /api/summary`: the same rows aggregated (totals, top 10 chart, table with shares,
//!   countdown)
//!
//! Any failure is a 500 with `{ "error": message, "kind": kind }`, where `kind` is one of
//! `auth`, `transport` or `malformed_response`.
//!
//! CORS allows exactly one origin, `CORS_ORIGIN`.
//!
//!
//!
//! # Environment
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `4000` |
//! | `GOOGLE_SHEET_ID` | required |
//! | `SHEET_RANGE` | `Entries` |
//! | `HEADER_SENTINEL` | `HolderAddress` |
//! | `GOOGLE_SERVICE_ACCOUNT_JSON` / `GOOGLE_SERVICE_ACCOUNT_PATH` | one required, or `/run/secrets/GOOGLE_SERVICE_ACCOUNT_JSON` |
//! | `CORS_ORIGIN` | `https://your-frontend-domain.com` |
//! | `SHEETS_API_BASE` | `https://sheets.googleapis.com/v4/` |
//! | `SWEEPSTAKES_END` | `2025-07-17T22:00:00-07:00` |
//! | `MERGE_WALLETS` | `false` |
//!
//! A `.env` file in the working directory is loaded first if present.
//!
//!
//!
//! # Setup
//!
//! Run the backend.
//! ```sh
//! RUST_LOG=info cargo run -p sweepstakes
//! ```
//!
//! Watch it from a terminal.
//! ```sh
//! cargo run -p dashboard --bin watch -- --url http://127.0.0.1:4000/api/sweepstakes
//! ```
use std::{future::pending, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use routes::{summary_handler, sweepstakes_handler};
use state::AppState;

pub fn router(state: Arc<AppState>, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(sweepstakes_handler))
        .route("/api/sweepstakes", get(sweepstakes_handler))
        .route("/api/summary", get(summary_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    // before tracing so RUST_LOG can come from .env
    let dotenv = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match dotenv {
        Ok(path) => info!("Loaded {}", path.display()),
        Err(e) => info!("No .env file loaded: {e}"),
    }

    info!("Loading config...");
    let config = Config::load().context("Environment misconfigured")?;

    let address = format!("0.0.0.0:{}", config.port);
    let cors_origin = config.cors_origin.clone();

    info!("Initializing state...");
    let state = AppState::new(config);
    info!(range = state.fetcher.range(), "Reading entries from sheet");

    let app = router(state, cors_origin);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
