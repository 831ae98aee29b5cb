//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use pasar_core::ProductId;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

/// Proxy the product listing. Pages start at 1.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Value>> {
    let page = query.page.unwrap_or(1).max(1);
    let products = state.backend().list_products(page).await?;
    Ok(Json(products))
}

/// Proxy the full catalog.
#[instrument(skip(state))]
pub async fn catalog(State(state): State<AppState>) -> Result<Json<Value>> {
    let catalog = state.backend().get_catalog().await?;
    Ok(Json(catalog))
}

/// Proxy the shop listing.
#[instrument(skip(state))]
pub async fn shops(State(state): State<AppState>) -> Result<Json<Value>> {
    let shops = state.backend().list_shops().await?;
    Ok(Json(shops))
}

/// Proxy a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = ProductId::new(id);
    if id.is_blank() {
        return Err(AppError::BadRequest("Product id is required".to_string()));
    }

    let product = state.backend().get_product(&id).await?;
    Ok(Json(product))
}
