//! Remote cart mutations.

use pasar_core::{BearerToken, ItemId, ProductId, Quantity};
use serde_json::Value;
use tracing::{info, instrument};

use super::{CartError, ValidationError};
use crate::backend::BackendClient;

/// Validates and sends cart mutations to the backend.
///
/// Inputs are checked before any request is built; a validation failure
/// never reaches the network.
#[derive(Clone)]
pub struct CartSyncClient {
    backend: BackendClient,
}

impl CartSyncClient {
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Delete a line from the remote cart.
    ///
    /// Returns the backend's acknowledgement. Single attempt.
    ///
    /// # Errors
    ///
    /// - `CartError::Validation` if the item id or token is missing or blank
    /// - `CartError::Transport` on network failure, timeout or non-2xx
    #[instrument(skip(self, token))]
    pub async fn delete_remote_item(
        &self,
        item_id: Option<&ItemId>,
        token: Option<&BearerToken>,
    ) -> Result<Value, CartError> {
        let item_id = item_id
            .filter(|id| !id.is_blank())
            .ok_or(ValidationError::MissingItemId)?;
        let token = require_token(token)?;

        let acknowledgement = self.backend.delete_cart_item(item_id, token).await?;
        info!(item_id = %item_id, "Remote cart line deleted");
        Ok(acknowledgement)
    }

    /// Add a product to the remote cart.
    ///
    /// # Errors
    ///
    /// - `CartError::Validation` if the product id or token is missing or blank
    /// - `CartError::Transport` on network failure, timeout or non-2xx
    #[instrument(skip(self, token))]
    pub async fn add_remote_item(
        &self,
        product_id: Option<&ProductId>,
        qty: Quantity,
        token: Option<&BearerToken>,
    ) -> Result<Value, CartError> {
        let product_id = product_id
            .filter(|id| !id.is_blank())
            .ok_or(ValidationError::MissingProductId)?;
        let token = require_token(token)?;

        let response = self.backend.add_cart_item(product_id, qty, token).await?;
        info!(product_id = %product_id, qty = qty.get(), "Product added to remote cart");
        Ok(response)
    }
}

fn require_token(token: Option<&BearerToken>) -> Result<&BearerToken, ValidationError> {
    token
        .filter(|token| !token.is_empty())
        .ok_or(ValidationError::MissingToken)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    // Nothing listens here; validation must fail before a connection is tried.
    fn offline_client() -> CartSyncClient {
        let config = BackendConfig::new("http://127.0.0.1:9").unwrap();
        CartSyncClient::new(BackendClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_delete_requires_item_id() {
        let token = BearerToken::new("tok");
        let err = offline_client()
            .delete_remote_item(None, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(ValidationError::MissingItemId)));

        let blank = ItemId::from("  ");
        let err = offline_client()
            .delete_remote_item(Some(&blank), Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(ValidationError::MissingItemId)));
    }

    #[tokio::test]
    async fn test_delete_requires_token() {
        let id = ItemId::Number(1);
        let err = offline_client()
            .delete_remote_item(Some(&id), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Validation(ValidationError::MissingToken)));

        let empty = BearerToken::new("");
        let err = offline_client()
            .delete_remote_item(Some(&id), Some(&empty))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_add_requires_product_id() {
        let token = BearerToken::new("tok");
        let blank = ProductId::new("");
        let err = offline_client()
            .add_remote_item(Some(&blank), Quantity::ONE, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CartError::Validation(ValidationError::MissingProductId)
        ));
    }
}
