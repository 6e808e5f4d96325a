//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│   Sale   │       │
//! │  │  Cart    │     │          │     │  choice  │     │ recorded │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                 │              │
//! │              POST   /api/cart/items          POST /api/sales            │
//! │              PUT    /api/cart/items/{id}     (sale.rs)                  │
//! │              DELETE /api/cart/items/{id}                                │
//! │                        │                                                │
//! │                        ▼                                                │
//! │              DELETE /api/cart ─────────────► back to empty             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every route answers with the whole cart and its totals, so the
//! frontend can redraw from a single response.

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use caixa_core::{Cart, CartItem, CartTotals};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::{debug, info};

use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_to_cart))
        .route(
            "/api/cart/items/{product_id}",
            put(update_cart_item).delete(remove_from_cart),
        )
}

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    debug!("get_cart command");
    Json(state.store.read(|s| CartResponse::from(&s.cart)).await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Already in cart: quantity increases
/// - Not in cart: new line with the product's current price frozen
/// - Stock is not checked
/// - `quantity: 0` leaves the cart as it is
/// - A line above the per-line limit answers 400
pub async fn add_to_cart(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddToCartRequest>,
) -> ApiResult<Json<CartResponse>> {
    debug!(
        product_id = %request.product_id,
        quantity = request.quantity,
        "add_to_cart command"
    );

    let cart = state
        .store
        .mutate(|s| {
            s.add_to_cart_by_id(&request.product_id, request.quantity)?;
            Ok::<_, caixa_core::CoreError>(CartResponse::from(&s.cart))
        })
        .await?;

    info!(
        product_id = %request.product_id,
        lines = cart.totals.item_count,
        "Added to cart"
    );
    Ok(Json(cart))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// Replaces a line's quantity. Zero removes the line; an id that is not
/// in the cart changes nothing. Above the per-line limit answers 400.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ApiJson(request): ApiJson<UpdateQuantityRequest>,
) -> ApiResult<Json<CartResponse>> {
    debug!(product_id = %product_id, quantity = request.quantity, "update_cart_item command");

    let cart = state
        .store
        .mutate(|s| {
            s.update_cart_quantity(&product_id, request.quantity)?;
            Ok::<_, caixa_core::CoreError>(CartResponse::from(&s.cart))
        })
        .await?;

    Ok(Json(cart))
}

/// Removes a line. Unknown ids are ignored.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<CartResponse>> {
    debug!(product_id = %product_id, "remove_from_cart command");

    let cart = state
        .store
        .mutate(|s| {
            s.remove_from_cart(&product_id);
            Ok::<_, Infallible>(CartResponse::from(&s.cart))
        })
        .await?;

    Ok(Json(cart))
}

pub async fn clear_cart(State(state): State<AppState>) -> ApiResult<Json<CartResponse>> {
    debug!("clear_cart command");

    let cart = state
        .store
        .mutate(|s| {
            s.clear_cart();
            Ok::<_, Infallible>(CartResponse::from(&s.cart))
        })
        .await?;

    info!("Cart cleared");
    Ok(Json(cart))
}
