//! # Sale Commands
//!
//! Finalizes the cart and serves the sale history and receipts.
//!
//! ## Sale Processing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    POST /api/sales                                      │
//! │                                                                         │
//! │  { "paymentMethod": "pix" }                                            │
//! │  { "payments": [{ "method": "pix", "amountCents": 1000 },              │
//! │                 { "method": "cash", "amountCents": 798 }] }            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Tender::Single / Tender::Split                                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  store.mutate(process_sale) ── EmptyCart ──► 409, nothing changed      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  201 Sale  (stock decremented, cart cleared, snapshot saved)           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  GET /api/sales/{id}/receipt?phone=5511987654321                       │
//! │        └──► { text, whatsappUrl }                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use caixa_core::receipt::{format_receipt, sanitize_phone, whatsapp_link};
use caixa_core::{CoreError, Payment, PaymentMethod, Sale, Tender, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sales", get(list_sales).post(process_sale))
        .route("/api/sales/{id}", get(get_sale))
        .route("/api/sales/{id}/receipt", get(sale_receipt))
}

/// Body of `POST /api/sales`.
///
/// `payments` wins when non-empty; otherwise `paymentMethod` is required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSaleRequest {
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl ProcessSaleRequest {
    pub fn into_tender(self) -> Result<Tender, ValidationError> {
        if !self.payments.is_empty() {
            return Ok(Tender::Split(self.payments));
        }
        self.payment_method
            .map(Tender::Single)
            .ok_or_else(|| ValidationError::Required {
                field: "paymentMethod".to_string(),
            })
    }
}

/// Turns the cart into a sale.
///
/// One transition under the store lock: totals, stock decrement, history
/// append and cart clear happen together or not at all. An empty cart
/// answers 409 before the payment fields are looked at.
pub async fn process_sale(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProcessSaleRequest>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    debug!("process_sale command");

    let sale = state
        .store
        .mutate(|s| {
            if s.cart.is_empty() {
                return Err(ApiError::from(CoreError::EmptyCart));
            }
            let tender = request.into_tender()?;
            s.process_sale(tender).map_err(ApiError::from)
        })
        .await?;

    info!(
        sale_id = %sale.id,
        total = %sale.total(),
        items = sale.items.len(),
        payment_method = ?sale.payment_method,
        split = sale.is_split(),
        "Sale recorded"
    );
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Sale history, oldest first.
pub async fn list_sales(State(state): State<AppState>) -> Json<Vec<Sale>> {
    debug!("list_sales command");
    Json(state.store.read(|s| s.sales().to_vec()).await)
}

pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    debug!(id = %id, "get_sale command");

    state
        .store
        .read(|s| s.sale(&id).cloned())
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", &id))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReceiptQuery {
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub sale_id: String,
    pub text: String,
    /// Present when a phone number was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
}

/// Receipt text for a sale, plus a `wa.me` link when `phone` is given.
pub async fn sale_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReceiptQuery>,
) -> ApiResult<Json<ReceiptResponse>> {
    debug!(id = %id, "sale_receipt command");

    let sale = state
        .store
        .read(|s| s.sale(&id).cloned())
        .await
        .ok_or_else(|| ApiError::not_found("Sale", &id))?;

    let text = format_receipt(&sale, &state.config.receipt_options());

    let whatsapp_url = match query.phone.as_deref() {
        Some(phone) if sanitize_phone(phone).is_empty() => {
            return Err(ValidationError::InvalidFormat {
                field: "phone".to_string(),
                reason: "must contain digits".to_string(),
            }
            .into());
        }
        Some(phone) => Some(whatsapp_link(phone, &text)),
        None => None,
    };

    Ok(Json(ReceiptResponse {
        sale_id: sale.id,
        text,
        whatsapp_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_into_tender() {
        let single: ProcessSaleRequest = serde_json::from_str(r#"{"paymentMethod":"pix"}"#).unwrap();
        assert_eq!(single.into_tender().unwrap(), Tender::Single(PaymentMethod::Pix));

        let split: ProcessSaleRequest = serde_json::from_str(
            r#"{"paymentMethod":"cash","payments":[{"method":"debit_card","amountCents":500}]}"#,
        )
        .unwrap();
        assert!(matches!(split.into_tender().unwrap(), Tender::Split(p) if p.len() == 1));

        let missing = ProcessSaleRequest::default();
        assert!(missing.into_tender().is_err());
    }
}
