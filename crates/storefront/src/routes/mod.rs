//! HTTP route handlers for the proxy server.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//!
//! # Products
//! GET    /api/products?page=N     - Product listing (cached)
//! GET    /api/products/{id}       - Product detail (cached)
//! GET    /api/catalog             - Full catalog (cached)
//! GET    /api/shop                - Shop listing (cached)
//!
//! # Cart (token supplied by the caller)
//! POST   /api/products/{id}       - Add to cart, body {token, productId, qty}
//! DELETE /api/cart/items/{id}     - Delete cart line, Authorization: Bearer
//!
//! # Account
//! POST   /api/register            - Register (JSON or multipart)
//! GET    /api/register            - 405
//! POST   /api/login               - Login
//! POST   /api/open-store          - Register a shop (multipart, Authorization: Bearer)
//! ```

pub mod auth;
pub mod cart;
pub mod envelope;
pub mod multipart;
pub mod products;
pub mod shops;

use axum::{
    Router,
    extract::Request,
    middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show).post(cart::add))
        .route("/catalog", get(products::catalog))
        .route("/shop", get(products::shops))
        .route("/cart/items/{id}", delete(cart::remove))
        .route(
            "/register",
            post(auth::register).get(auth::register_not_allowed),
        )
        .route("/login", post(auth::login))
        .route("/open-store", post(shops::open_store))
}

/// Build the full application router with tracing and request IDs.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::StatusCode,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::{BackendConfig, LogFormat, StorefrontConfig};

    fn offline_app() -> Router {
        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            backend: BackendConfig {
                base_url: "http://127.0.0.1:9".parse().unwrap(),
                timeout: Duration::from_millis(200),
            },
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
        };
        app(AppState::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let response = offline_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = offline_app()
            .oneshot(Request::get("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_get_is_rejected() {
        let response = offline_app()
            .oneshot(Request::get("/api/register").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
