//! Backend API client implementation.
//!
//! Uses `reqwest` with a per-request timeout. Every call is a single attempt;
//! callers decide what to do with a failure.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use pasar_core::{BearerToken, ItemId, ProductId, Quantity};
use reqwest::multipart::{Form, Part};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::BackendError;
use super::cache::CacheKey;
use super::types::{
    AddCartItemBody, ApiEnvelope, Credentials, CredentialsBody, LoginData, Registration,
    RegistrationBody, ShopRegistration, Upload, UserProfile,
};
use crate::config::BackendConfig;

const USER_AGENT: &str = concat!("pasar-storefront/", env!("CARGO_PKG_VERSION"));

/// Response bodies are truncated to this many characters in logs.
const BODY_LOG_LIMIT: usize = 500;

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the backend API.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, Value>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidRequest("backend URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, BackendError> {
        let body = self.send_raw(request).await?;
        parse_json(&body)
    }

    /// Send a cart mutation. Any 2xx counts as accepted, whatever the body.
    async fn send_mutation(&self, request: RequestBuilder) -> Result<Value, BackendError> {
        let body = self.send_raw(request).await?;
        Ok(acknowledgement(body))
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, timeout = e.is_timeout(), "Backend request failed");
            BackendError::Http(e)
        })?;
        read_success_body(response).await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products, one page at a time. Pages start at 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32) -> Result<Value, BackendError> {
        let cache_key = CacheKey::Products { page };
        if let Some(products) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let url = self.endpoint(&["api", "products"])?;
        let products = self
            .send(self.inner.client.get(url).query(&[("page", page)]))
            .await?;

        self.inner.cache.insert(cache_key, products.clone()).await;
        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the backend answers 404, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Value, BackendError> {
        let cache_key = CacheKey::Product(id.as_str().to_owned());
        if let Some(product) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.endpoint(&["api", "products", id.as_str()])?;
        let product = match self.send(self.inner.client.get(url)).await {
            Err(BackendError::Api { status: 404, .. }) => {
                return Err(BackendError::NotFound(format!("Product not found: {id}")));
            }
            other => other?,
        };

        self.inner.cache.insert(cache_key, product.clone()).await;
        Ok(product)
    }

    /// Get the full product catalog in one response.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_catalog(&self) -> Result<Value, BackendError> {
        self.cached_get(CacheKey::Catalog, &["api", "catalog"]).await
    }

    // =========================================================================
    // Shop Methods
    // =========================================================================

    /// List the shops shown in the storefront header.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_shops(&self) -> Result<Value, BackendError> {
        self.cached_get(CacheKey::Shops, &["api", "shop"]).await
    }

    async fn cached_get(&self, key: CacheKey, segments: &[&str]) -> Result<Value, BackendError> {
        if let Some(value) = self.inner.cache.get(&key).await {
            debug!(key = ?key, "Cache hit");
            return Ok(value);
        }

        let url = self.endpoint(segments)?;
        let value = self.send(self.inner.client.get(url)).await?;

        self.inner.cache.insert(key, value.clone()).await;
        Ok(value)
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Add a product to the shopper's remote cart.
    ///
    /// Returns the backend's response body, which may be the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, token), fields(product_id = %product_id, qty = qty.get()))]
    pub async fn add_cart_item(
        &self,
        product_id: &ProductId,
        qty: Quantity,
        token: &BearerToken,
    ) -> Result<Value, BackendError> {
        let url = self.endpoint(&["api", "cart", "items"])?;
        let body = AddCartItemBody {
            product_id,
            qty: qty.get(),
        };

        self.send_mutation(
            self.inner
                .client
                .post(url)
                .header(AUTHORIZATION, token.authorization_value())
                .json(&body),
        )
        .await
    }

    /// Delete a line from the shopper's remote cart.
    ///
    /// Returns the backend's acknowledgement payload: JSON when it parses,
    /// the raw text otherwise, `Value::Null` for an empty body.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, or a non-2xx response.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn delete_cart_item(
        &self,
        item_id: &ItemId,
        token: &BearerToken,
    ) -> Result<Value, BackendError> {
        let id = item_id.to_string();
        let url = self.endpoint(&["api", "cart", "items", &id])?;

        self.send_mutation(
            self.inner
                .client
                .delete(url)
                .header(AUTHORIZATION, token.authorization_value()),
        )
        .await
    }

    // =========================================================================
    // Account Methods
    // =========================================================================

    /// Register a shopper account.
    ///
    /// Sent as multipart when an avatar file is attached, JSON otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an
    /// envelope.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register_user(
        &self,
        registration: &Registration,
    ) -> Result<ApiEnvelope<UserProfile>, BackendError> {
        let url = self.endpoint(&["api", "auth", "register"])?;

        let request = match &registration.avatar {
            Some(avatar) => {
                debug!(file_name = %avatar.file_name, "Sending registration as multipart");
                let mut form = Form::new()
                    .text("name", registration.name.clone())
                    .text("email", registration.email.as_str().to_owned())
                    .text(
                        "password",
                        registration.password.expose_secret().to_owned(),
                    );
                if let Some(avatar_url) = &registration.avatar_url {
                    form = form.text("avatarUrl", avatar_url.clone());
                }
                form = form.part("avatar", upload_part(avatar)?);
                self.inner.client.post(url).multipart(form)
            }
            None => self
                .inner
                .client
                .post(url)
                .json(&RegistrationBody::from(registration)),
        };

        let body = self.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Log in and obtain a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not an
    /// envelope.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<ApiEnvelope<LoginData>, BackendError> {
        let url = self.endpoint(&["api", "auth", "login"])?;
        let body = self
            .send(
                self.inner
                    .client
                    .post(url)
                    .json(&CredentialsBody::from(credentials)),
            )
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Register a shop for the logged-in seller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, shop, token), fields(slug = %shop.slug))]
    pub async fn register_shop(
        &self,
        shop: &ShopRegistration,
        token: &BearerToken,
    ) -> Result<Value, BackendError> {
        let url = self.endpoint(&["api", "shops"])?;

        let mut form = Form::new()
            .text("name", shop.name.clone())
            .text("slug", shop.slug.clone())
            .text("address", shop.address.clone());
        if let Some(logo) = &shop.logo {
            form = form.part("avatar", upload_part(logo)?);
        }

        self.send(
            self.inner
                .client
                .post(url)
                .header(AUTHORIZATION, token.authorization_value())
                .multipart(form),
        )
        .await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn upload_part(upload: &Upload) -> Result<Part, BackendError> {
    let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
    match &upload.content_type {
        Some(content_type) => part.mime_str(content_type).map_err(|e| {
            BackendError::InvalidRequest(format!("invalid content type {content_type}: {e}"))
        }),
        None => Ok(part),
    }
}

/// Read a response body as JSON, mapping non-2xx statuses to `BackendError::Api`.
/// Read the body of a 2xx response; anything else becomes `BackendError::Api`.
async fn read_success_body(response: Response) -> Result<String, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(
            status = %status,
            body = %truncate(&body),
            "Backend returned non-success status"
        );
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        return Err(BackendError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

fn parse_json(body: &str) -> Result<Value, BackendError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, body = %truncate(body), "Failed to parse backend response");
        BackendError::Parse(e)
    })
}

/// The payload of an accepted mutation: JSON if it parses, the raw text
/// otherwise, `Null` when empty.
fn acknowledgement(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }

    serde_json::from_str(&body).unwrap_or_else(|e| {
        debug!(error = %e, body = %truncate(&body), "Non-JSON acknowledgement");
        Value::String(body)
    })
}

/// Extract a human-readable message from an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_owned))
        .filter(|message| !message.trim().is_empty())
}

fn truncate(body: &str) -> String {
    body.chars().take(BODY_LOG_LIMIT).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(&BackendConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("http://localhost:8080");
        let url = client.endpoint(&["api", "cart", "items", "42"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/cart/items/42");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("http://localhost:8080/v1/");
        let url = client.endpoint(&["api", "products"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/api/products");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = client("http://localhost:8080");
        let url = client.endpoint(&["api", "cart", "items", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/cart/items/a%2Fb%20c");
    }

    #[test]
    fn test_error_message_prefers_message_then_error() {
        assert_eq!(
            error_message(r#"{"message": "Token expired"}"#).as_deref(),
            Some("Token expired")
        );
        assert_eq!(
            error_message(r#"{"error": "Forbidden"}"#).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(error_message(r#"{"message": ""}"#), None);
        assert_eq!(error_message("<html>Bad gateway</html>"), None);
    }

    #[test]
    fn test_acknowledgement_accepts_any_body() {
        assert_eq!(acknowledgement(String::new()), Value::Null);
        assert_eq!(acknowledgement("  \n".to_string()), Value::Null);
        assert_eq!(acknowledgement("OK".to_string()), Value::String("OK".to_string()));
        assert_eq!(
            acknowledgement(r#"{"message": "deleted"}"#.to_string()),
            serde_json::json!({"message": "deleted"})
        );
    }

    #[test]
    fn test_parse_json_rejects_text() {
        assert!(matches!(parse_json("OK"), Err(BackendError::Parse(_))));
        assert_eq!(parse_json("").unwrap(), Value::Null);
    }

    #[test]
    fn test_truncate() {
        let long = "x".repeat(BODY_LOG_LIMIT + 10);
        assert_eq!(truncate(&long).len(), BODY_LOG_LIMIT);
    }
}
