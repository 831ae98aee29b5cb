//! Backend API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`, one bounded timeout per request
//! - The backend is the source of truth for carts; responses are decoded
//!   through the DTOs in [`conversions`] before entering the cart store
//! - Product payloads are passed through opaquely and cached via `moka`
//!   (5 minute TTL)
//!
//! # Endpoints
//!
//! ```text
//! GET    /api/products?page=N
//! GET    /api/products/{id}
//! GET    /api/catalog
//! GET    /api/shop
//! POST   /api/cart/items            (bearer)
//! DELETE /api/cart/items/{id}       (bearer)
//! POST   /api/auth/register
//! POST   /api/auth/login
//! POST   /api/shops                 (bearer, multipart)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pasar_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend)?;
//! let ack = client.delete_cart_item(&ItemId::from(42), &token).await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod types;

pub use client::BackendClient;
pub use conversions::{CartDecodeError, decode_cart_payload};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection refused, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request could not be built (bad URL or upload metadata).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// Whether the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// The HTTP status the backend answered with, if it answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}
