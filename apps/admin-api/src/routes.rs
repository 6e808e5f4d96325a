//! HTTP routes for the admin API.
//!
//! - `GET  /health`
//! - `POST /api/tenants` (bearer + `provision_tenants` capability)
//!
//! `OPTIONS` preflight for browser callers is answered by the CORS layer in
//! `build_router`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::{Caller, Capability};
use crate::error::{AdminError, AdminResult};
use crate::services::{provision_tenant, ProvisionRequest, ProvisionResponse};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/tenants", post(create_tenant))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = state.backend.health_check().await;
    Json(HealthResponse {
        status: if backend { "ok" } else { "degraded" },
        backend,
    })
}

/// Fails with 403 unless `caller` holds `capability`.
async fn require_capability(
    state: &AppState,
    caller: &Caller,
    capability: Capability,
) -> AdminResult<()> {
    if state.backend.has_capability(caller.user_id, capability).await? {
        return Ok(());
    }

    warn!(
        user_id = %caller.user_id,
        email = caller.email.as_deref().unwrap_or("-"),
        capability = capability.as_str(),
        "Capability denied"
    );
    Err(AdminError::Forbidden(format!(
        "missing capability {}",
        capability.as_str()
    )))
}

/// `POST /api/tenants`
///
/// A body that is not a valid `ProvisionRequest` answers 400 `{error}`, after
/// the bearer check.
pub async fn create_tenant(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<ProvisionRequest>, JsonRejection>,
) -> AdminResult<Json<ProvisionResponse>> {
    debug!(user_id = %caller.user_id, "create_tenant");
    let Json(request) =
        payload.map_err(|rejection| AdminError::InvalidRequest(rejection.body_text()))?;
    require_capability(&state, &caller, Capability::ProvisionTenants).await?;

    let response = provision_tenant(
        state.backend.as_ref(),
        request,
        state.config.default_days_given,
        Utc::now(),
    )
    .await?;

    Ok(Json(response))
}
