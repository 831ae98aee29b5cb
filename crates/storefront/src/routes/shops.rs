//! Seller onboarding.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde_json::Value;
use tracing::{info, instrument};

use super::envelope::EnvelopeError;
use super::multipart::FormFields;
use crate::backend::ShopRegistration;
use crate::middleware::BearerAuth;
use crate::state::AppState;

const SHOP_MISSING_FIELDS: &str = "Missing required fields: name, slug, and address are required";

/// Register a shop for the logged-in seller.
///
/// `POST /api/open-store`, multipart with `name`, `slug`, `address` and an
/// optional logo file (`avatar` or `logo`).
#[instrument(skip(state, token, multipart))]
pub async fn open_store(
    State(state): State<AppState>,
    BearerAuth(token): BearerAuth,
    multipart: Multipart,
) -> Result<Json<Value>, EnvelopeError> {
    let Some(token) = token else {
        return Err(EnvelopeError::new(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
        ));
    };

    let mut form = FormFields::read(multipart)
        .await
        .map_err(|e| EnvelopeError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    let (Some(name), Some(slug), Some(address)) =
        (form.text("name"), form.text("slug"), form.text("address"))
    else {
        return Err(EnvelopeError::new(
            StatusCode::BAD_REQUEST,
            SHOP_MISSING_FIELDS,
        ));
    };
    let (name, slug, address) = (name.to_owned(), slug.to_owned(), address.to_owned());
    let logo = form.take_file("avatar").or_else(|| form.take_file("logo"));

    let shop = ShopRegistration {
        name,
        slug,
        address,
        logo,
    };

    let response = state
        .backend()
        .register_shop(&shop, &token)
        .await
        .map_err(|e| EnvelopeError::from_backend(&e, "Shop registration failed"))?;

    info!(slug = %shop.slug, "Shop registered");
    Ok(Json(response))
}
