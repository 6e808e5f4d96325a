//! # Commands Module
//!
//! HTTP handlers exposed to the POS frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (route table, health)
//! ├── product.rs  ◄─── Catalog search, CRUD, stock
//! ├── cart.rs     ◄─── Cart manipulation
//! ├── sale.rs     ◄─── Sale processing, history, receipts
//! └── report.rs   ◄─── Sales reports
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Frontend                                                               │
//! │  fetch('/api/cart/items', { method: 'POST',                             │
//! │        body: JSON.stringify({ productId, quantity: 2 }) })              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn add_to_cart(                                                  │
//! │      State(state): State<AppState>,     ◄── cloned per request          │
//! │      ApiJson(request): ApiJson<AddToCartRequest>,                       │
//! │  ) -> ApiResult<Json<CartResponse>>                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  200 { items: [...], totals: {...} }   or   4xx { code, message }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod product;
pub mod report;
pub mod sale;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Every POS route, without state or middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(product::router())
        .merge(cart::router())
        .merge(sale::router())
        .merge(report::router())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}

/// Liveness plus a database ping.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.store.database().health_check().await;
    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
