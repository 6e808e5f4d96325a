//! # Product Commands
//!
//! Catalog routes: list/search, create, patch, stock adjustment, low stock.
//!
//! ```text
//! GET    /api/products?q=coca          search_products
//! POST   /api/products                 create_product
//! GET    /api/products/low-stock       low_stock
//! GET    /api/products/{id}            get_product
//! PATCH  /api/products/{id}            update_product
//! POST   /api/products/{id}/stock      adjust_stock   { "delta": -3 }
//! ```

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use caixa_core::validation::{validate_new_product, validate_product_update, validate_search_query};
use caixa_core::{NewProduct, Product, ProductUpdate, DEFAULT_LOW_STOCK_THRESHOLD};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiJson, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(search_products).post(create_product))
        .route("/api/products/low-stock", get(low_stock))
        .route("/api/products/{id}", get(get_product).patch(update_product))
        .route("/api/products/{id}/stock", post(adjust_stock))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Lists the catalog. With `q`, only products whose name, SKU or category
/// contains it (case-insensitive).
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let q = validate_search_query(query.q.as_deref().unwrap_or_default())?;
    debug!(query = %q, "search_products command");

    let products = state.store.read(|s| s.search_products(&q)).await;

    debug!(count = products.len(), "Search complete");
    Ok(Json(products))
}

/// Adds a product to the catalog under a new id.
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    debug!(sku = %input.sku, "create_product command");
    validate_new_product(&input)?;

    let product = state
        .store
        .mutate(|s| Ok::<_, ApiError>(s.add_product(input)))
        .await?;

    info!(product_id = %product.id, sku = %product.sku, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    debug!(id = %id, "get_product command");

    state
        .store
        .read(|s| s.product(&id).cloned())
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

/// Applies a partial update. Cart lines and past sales keep their snapshot.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    debug!(id = %id, "update_product command");
    validate_product_update(&update)?;

    let product = state
        .store
        .mutate(|s| s.update_product(&id, &update))
        .await?;

    info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    /// Units to add (positive) or remove (negative).
    pub delta: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: String,
    pub stock: u32,
}

/// Moves stock by `delta`. The result never goes below zero.
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(adjustment): ApiJson<StockAdjustment>,
) -> ApiResult<Json<StockLevel>> {
    debug!(id = %id, delta = adjustment.delta, "adjust_stock command");

    let stock = state
        .store
        .mutate(|s| {
            s.adjust_stock(&id, adjustment.delta)
                .ok_or_else(|| ApiError::not_found("Product", &id))
        })
        .await?;

    info!(product_id = %id, stock, "Stock adjusted");
    Ok(Json(StockLevel {
        product_id: id,
        stock,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<u32>,
}

/// Products at or below `threshold` units (default 5), lowest first.
pub async fn low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    debug!(threshold, "low_stock command");

    Ok(Json(state.store.read(|s| s.low_stock(threshold)).await))
}
