//! # Report Commands
//!
//! `GET /api/reports/sales?from=2026-10-01T03:00:00Z&to=2026-11-01T03:00:00Z`
//!
//! Both bounds are optional RFC 3339 timestamps; `from` is inclusive and
//! `to` exclusive.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use caixa_core::{DateRange, SalesReport};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/reports/sales", get(sales_report))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<SalesReport>> {
    debug!(from = ?query.from, to = ?query.to, "sales_report command");

    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from >= to {
            return Err(ApiError::validation("`from` must be earlier than `to`"));
        }
    }

    let range = DateRange::new(query.from, query.to);
    Ok(Json(state.store.read(|s| s.report(range)).await))
}
