//! # Caixa POS API
//!
//! Local HTTP backend for the POS frontend.
//!
//! ## Module Organization
//! ```text
//! caixa_pos_api/
//! ├── lib.rs          ◄─── You are here (router, startup)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── store.rs    ◄─── PosStore: locked PosState + snapshot
//! │   └── config.rs   ◄─── PosConfig::from_env
//! ├── commands/
//! │   ├── mod.rs      ◄─── Route table, health
//! │   ├── product.rs  ◄─── Catalog
//! │   ├── cart.rs     ◄─── Cart
//! │   ├── sale.rs     ◄─── Sales and receipts
//! │   └── report.rs   ◄─── Reports
//! └── error.rs        ◄─── ApiError for handlers
//! ```

pub mod commands;
pub mod error;
pub mod state;

use axum::Router;
use caixa_db::{Database, DbConfig};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppState, PosConfig, PosStore};

/// Builds the full application router with middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    commands::routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Runs the POS API until Ctrl+C / SIGTERM.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Open SQLite at config.database_path, run migrations                 │
/// │  2. Restore PosState from the snapshot key (or start empty)             │
/// │  3. Bind config.bind_addr and serve                                     │
/// │  4. On shutdown signal: finish in-flight requests, close the pool       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config: PosConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %config.database_path.display(), "Opening database");
    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let store = PosStore::load(db.clone(), &config.storage_key).await?;
    let addr = config.bind_addr;
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "POS API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("POS API stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - Default: `info,caixa=debug,sqlx=warn`
/// - Override with `RUST_LOG`, e.g. `RUST_LOG=caixa_pos_api=trace`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caixa=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
