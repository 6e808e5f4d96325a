//! # Caixa Admin API
//!
//! HTTP endpoint that provisions tenants (companies) for the POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Admin API Services                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────────┐  ┌────────────────────────┐│
//! │  │  routes        │  │  services          │  │  backend               ││
//! │  │                │  │                    │  │                        ││
//! │  │ • /health      │─►│ • provision_tenant │─►│ • PostgresBackend      ││
//! │  │ • /api/tenants │  │   + compensation   │  │ • InMemoryBackend      ││
//! │  └────────────────┘  └────────────────────┘  └────────────────────────┘│
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ┌────────────────┐                                                     │
//! │  │  auth          │  HS256 bearer → Caller → Capability check          │
//! │  └────────────────┘                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the environment variables.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::auth::JwtManager;
use crate::backend::{InMemoryBackend, PostgresBackend, TenantBackend};
use crate::config::{AdminConfig, BackendKind};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn TenantBackend>,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<AdminConfig>,
}

impl AppState {
    pub fn new(backend: Arc<dyn TenantBackend>, config: AdminConfig) -> Self {
        AppState {
            backend,
            jwt: Arc::new(JwtManager::new(config.jwt_secret.clone())),
            config: Arc::new(config),
        }
    }
}

/// Router with CORS (answers `OPTIONS` preflight) and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    routes::routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Connects the configured backend.
pub async fn connect_backend(config: &AdminConfig) -> Result<Arc<dyn TenantBackend>, Box<dyn std::error::Error>> {
    match config.backend {
        BackendKind::Postgres => {
            let backend = PostgresBackend::connect(&config.database_url).await?;
            info!("Connected to PostgreSQL");
            backend.run_migrations().await?;
            Ok(Arc::new(backend))
        }
        BackendKind::Memory => {
            tracing::warn!("Using in-memory backend; nothing will be persisted");
            Ok(Arc::new(InMemoryBackend::new()))
        }
    }
}

/// Serves until Ctrl+C / SIGTERM.
pub async fn run(config: AdminConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = connect_backend(&config).await?;
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let app = build_router(AppState::new(backend, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caixa=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
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
                tracing::error!(error = %e, "Failed to install signal handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
