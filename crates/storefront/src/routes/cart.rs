//! Cart route handlers.
//!
//! Thin proxies over [`CartSyncClient`](crate::cart::CartSyncClient). The
//! server holds no cart; the caller applies the result to its own store.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use pasar_core::{BearerToken, ItemId, ProductId, Quantity};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::cart::CartError;
use crate::error::{AppError, Result};
use crate::middleware::BearerAuth;
use crate::state::AppState;

pub const ADD_MISSING_FIELDS: &str =
    "Missing required fields: token, productId, and qty are required";
pub const ADD_FAILED: &str = "An error occurred while adding item to cart";
pub const DELETE_MISSING_FIELDS: &str = "Missing required fields: token and itemId are required";
pub const DELETE_FAILED: &str = "An error occurred while deleting item from cart";

/// Add-to-cart body. Fields are loosely typed and checked in [`Self::validate`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub qty: Option<Value>,
}

impl AddToCartRequest {
    /// The token, product id and quantity, if all are present and valid.
    fn validate(&self) -> Option<(BearerToken, ProductId, Quantity)> {
        let token = self.token.as_deref().and_then(BearerToken::non_empty)?;
        let product_id = self
            .product_id
            .as_ref()
            .and_then(loose_product_id)
            .filter(|id| !id.is_blank())?;
        let qty = self
            .qty
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|qty| u32::try_from(qty).ok())
            .and_then(|qty| Quantity::new(qty).ok())?;
        Some((token, product_id, qty))
    }
}

/// Product ids arrive as strings or numbers.
fn loose_product_id(value: &Value) -> Option<ProductId> {
    match value {
        Value::String(id) => Some(ProductId::new(id.clone())),
        Value::Number(id) => Some(ProductId::new(id.to_string())),
        _ => None,
    }
}

/// Add a product to the shopper's cart.
///
/// `POST /api/products/{id}` with `{token, productId, qty}`. The product id
/// in the body is authoritative.
#[instrument(skip(state, payload))]
pub async fn add(
    State(state): State<AppState>,
    Path(path_id): Path<String>,
    payload: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let request = payload.map_or_else(
        |rejection| {
            warn!(error = %rejection, "Unreadable add-to-cart body");
            AddToCartRequest::default()
        },
        |Json(request)| request,
    );

    let Some((token, product_id, qty)) = request.validate() else {
        return Err(AppError::BadRequest(ADD_MISSING_FIELDS.to_string()));
    };
    if product_id.as_str() != path_id {
        debug!(body_product_id = %product_id, "Path and body product ids differ");
    }

    state
        .cart_sync()
        .add_remote_item(Some(&product_id), qty, Some(&token))
        .await
        .map(Json)
        .map_err(|e| match e {
            CartError::Validation(_) => AppError::BadRequest(ADD_MISSING_FIELDS.to_string()),
            other => AppError::upstream(ADD_FAILED, other),
        })
}

/// Delete a line from the shopper's cart.
///
/// `DELETE /api/cart/items/{id}` with `Authorization: Bearer <token>`.
#[instrument(skip(state, token))]
pub async fn remove(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    BearerAuth(token): BearerAuth,
) -> Result<Json<Value>> {
    let item_id = ItemId::from(item_id);

    state
        .cart_sync()
        .delete_remote_item(Some(&item_id), token.as_ref())
        .await
        .map(Json)
        .map_err(|e| match e {
            CartError::Validation(_) => AppError::BadRequest(DELETE_MISSING_FIELDS.to_string()),
            other => AppError::upstream(DELETE_FAILED, other),
        })
}
