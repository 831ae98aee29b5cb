//! Integration tests for Pasar.
//!
//! Every test runs against a `wiremock` server standing in for the backend
//! API, so nothing external is required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pasar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_sync` - cart store + sync client + service against the mock backend
//! - `proxy_routes` - the axum router driven with `tower::ServiceExt::oneshot`

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use pasar_core::{BearerToken, Cart};
use pasar_storefront::backend::BackendClient;
use pasar_storefront::cart::{CartService, CartStore, CartSyncClient};
use pasar_storefront::config::{BackendConfig, LogFormat, StorefrontConfig};
use pasar_storefront::state::AppState;
use pasar_storefront::storage::{CART_KEY, MemoryStore, TOKEN_KEY};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Token seeded into test stores.
pub const TEST_TOKEN: &str = "tok_test_123";

/// The two-line cart used across scenarios: shop A with
/// `{id 1, qty 2, 100}` and `{id 2, qty 1, 50}`, grand total 150.
#[must_use]
pub fn sample_cart_json() -> Value {
    json!({
        "groups": [{
            "shop": {"name": "Toko A", "slug": "toko-a"},
            "items": [
                {"id": 1, "product": {"title": "Kopi Gayo", "images": ["https://cdn.example/kopi.jpg"]}, "qty": 2, "subtotal": 100},
                {"id": 2, "product": {"title": "Teh Melati", "images": []}, "qty": 1, "subtotal": 50}
            ]
        }],
        "grandTotal": 150
    })
}

/// The sample cart as a domain value.
///
/// # Panics
///
/// Panics if the sample JSON no longer decodes.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn sample_cart() -> Cart {
    serde_json::from_value(sample_cart_json()).unwrap()
}

/// An in-memory store holding the sample cart and, optionally, a token.
#[must_use]
pub fn seeded_storage(with_token: bool) -> MemoryStore {
    let storage = MemoryStore::new().with_entry(CART_KEY, &sample_cart_json().to_string());
    if with_token {
        storage.with_entry(TOKEN_KEY, TEST_TOKEN)
    } else {
        storage
    }
}

/// The bearer token tests authenticate with.
#[must_use]
pub fn test_token() -> BearerToken {
    BearerToken::new(TEST_TOKEN)
}

/// Backend configuration pointing at the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid base URL.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn backend_config(server: &MockServer) -> BackendConfig {
    BackendConfig::new(&server.uri()).unwrap()
}

/// Backend client with a short timeout for timeout tests.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn backend_client(server: &MockServer, timeout: Option<Duration>) -> BackendClient {
    let mut config = backend_config(server);
    if let Some(timeout) = timeout {
        config = config.with_timeout(timeout);
    }
    BackendClient::new(&config).unwrap()
}

/// A cart service over `storage`, talking to the mock server.
#[must_use]
pub fn cart_service(server: &MockServer, storage: MemoryStore) -> CartService<MemoryStore> {
    let sync = CartSyncClient::new(backend_client(server, None));
    CartService::new(CartStore::open(storage), sync)
}

/// Application state for router tests.
///
/// # Panics
///
/// Panics if the backend client cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn app_state(server: &MockServer) -> AppState {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        backend: backend_config(server),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
    };
    AppState::new(config).unwrap()
}
