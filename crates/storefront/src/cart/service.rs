//! Cart operations that span the local store and the backend.

use pasar_core::{Cart, CartItem, ProductId, Quantity};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{CartError, CartStore, CartSyncClient};
use crate::backend::decode_cart_payload;
use crate::storage::KeyValueStore;

/// Outcome of [`CartService::remove_line`].
#[derive(Debug)]
pub enum Removal {
    /// The backend accepted the delete and the line was removed locally.
    Removed {
        cart: Cart,
        removed: CartItem,
        acknowledgement: Value,
    },
    /// No line at the given position; nothing was sent or written.
    Unchanged(Option<Cart>),
}

/// Outcome of [`CartService::add_line`].
#[derive(Debug)]
pub enum Addition {
    /// The backend returned the updated cart and it replaced the local one.
    Replaced(Cart),
    /// The backend acknowledged the add without returning a cart.
    Acknowledged(Value),
}

/// Coordinates local cart state with the backend.
///
/// Local removal happens only after the remote delete succeeds, so a failed
/// request leaves the persisted cart exactly as it was.
pub struct CartService<S> {
    store: CartStore<S>,
    sync: CartSyncClient,
}

impl<S: KeyValueStore> CartService<S> {
    #[must_use]
    pub const fn new(store: CartStore<S>, sync: CartSyncClient) -> Self {
        Self { store, sync }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut CartStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> CartStore<S> {
        self.store
    }

    /// Remove the line at (`group_index`, `item_index`).
    ///
    /// # Errors
    ///
    /// - `CartError::Validation` if no token is stored
    /// - `CartError::Transport` if the remote delete fails (local cart untouched)
    /// - `CartError::Storage` if the token cannot be read or the cart written
    #[instrument(skip(self))]
    pub async fn remove_line(
        &mut self,
        group_index: usize,
        item_index: usize,
    ) -> Result<Removal, CartError> {
        let Some(line) = self
            .store
            .cart()
            .and_then(|cart| cart.item(group_index, item_index))
            .cloned()
        else {
            debug!("No cart line at index, nothing to remove");
            return Ok(Removal::Unchanged(self.store.cart().cloned()));
        };

        let token = self.store.token()?;
        let acknowledgement = self
            .sync
            .delete_remote_item(Some(&line.id), token.as_ref())
            .await?;

        let cart = self
            .store
            .remove_item(group_index, item_index)?
            .cloned()
            .unwrap_or_default();

        info!(
            item_id = %line.id,
            grand_total = %cart.grand_total(),
            "Cart line removed"
        );

        Ok(Removal::Removed {
            cart,
            removed: line,
            acknowledgement,
        })
    }

    /// Add `qty` of a product to the remote cart.
    ///
    /// If the backend answers with a cart, it replaces the local one.
    ///
    /// # Errors
    ///
    /// - `CartError::Validation` if no token is stored or the product id is blank
    /// - `CartError::Transport` if the backend call fails
    /// - `CartError::Storage` if the token cannot be read or the cart written
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_line(
        &mut self,
        product_id: &ProductId,
        qty: Quantity,
    ) -> Result<Addition, CartError> {
        let token = self.store.token()?;
        let response = self
            .sync
            .add_remote_item(Some(product_id), qty, token.as_ref())
            .await?;

        match decode_cart_payload(&response) {
            Some(cart) => {
                let cart = self.store.save(cart)?.clone();
                info!(lines = cart.line_count(), "Local cart replaced from backend");
                Ok(Addition::Replaced(cart))
            }
            None => {
                debug!("Backend response carried no cart, local cart left as is");
                Ok(Addition::Acknowledged(response))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pasar_core::{CartGroup, ItemId, Money, ProductSnapshot, Shop};

    use super::*;
    use crate::backend::BackendClient;
    use crate::cart::ValidationError;
    use crate::config::BackendConfig;
    use crate::storage::MemoryStore;

    fn service() -> CartService<MemoryStore> {
        let mut store = CartStore::open(MemoryStore::new());
        store
            .save(Cart::new(vec![CartGroup::new(
                Shop {
                    name: "A".to_string(),
                    slug: "a".to_string(),
                },
                vec![CartItem {
                    id: ItemId::Number(1),
                    product: ProductSnapshot {
                        title: "T".to_string(),
                        images: Vec::new(),
                    },
                    qty: Quantity::new(2).unwrap(),
                    subtotal: Money::from_units(100),
                }],
            )])
            .unwrap())
            .unwrap();

        let config = BackendConfig::new("http://127.0.0.1:9").unwrap();
        let sync = CartSyncClient::new(BackendClient::new(&config).unwrap());
        CartService::new(store, sync)
    }

    #[tokio::test]
    async fn test_stale_index_is_unchanged() {
        let mut service = service();
        let before = service.store().cart().cloned();

        match service.remove_line(0, 5).await.unwrap() {
            Removal::Unchanged(cart) => assert_eq!(cart, before),
            Removal::Removed { .. } => panic!("stale index removed a line"),
        }
    }

    #[tokio::test]
    async fn test_missing_token_keeps_cart() {
        let mut service = service();
        let before = service.store().cart().cloned();

        let err = service.remove_line(0, 0).await.unwrap_err();
        assert!(matches!(err, CartError::Validation(ValidationError::MissingToken)));
        assert_eq!(service.store_mut().load().cloned(), before);
    }

    #[tokio::test]
    async fn test_add_without_token_fails_validation() {
        let mut service = service();
        let err = service
            .add_line(&ProductId::new("p-1"), Quantity::ONE)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
