//! Persisted cart state.

use pasar_core::{BearerToken, Cart};
use tracing::{debug, warn};

use crate::storage::{CART_KEY, KeyValueStore, StorageError, TOKEN_KEY};

/// The shopper's cart and token, written through to a [`KeyValueStore`].
///
/// Single writer: the store keeps an in-memory copy of the cart and assumes
/// nothing else writes the `"cart"` key while it is open.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Option<Cart>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open a store, reading whatever cart is already persisted.
    pub fn open(storage: S) -> Self {
        let cart = read_cart(&storage);
        Self { storage, cart }
    }

    /// Re-read the persisted cart.
    ///
    /// Returns `None` if nothing is stored or the stored value cannot be
    /// parsed. Never fails.
    pub fn load(&mut self) -> Option<&Cart> {
        self.cart = read_cart(&self.storage);
        self.cart.as_ref()
    }

    /// The cart as last loaded or written.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// Persist `cart`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be serialized or written. The
    /// in-memory copy is left unchanged in that case.
    pub fn save(&mut self, cart: Cart) -> Result<&Cart, StorageError> {
        let json = serde_json::to_string(&cart)?;
        self.storage.set(CART_KEY, &json)?;
        debug!(
            groups = cart.groups().len(),
            grand_total = %cart.grand_total(),
            "Cart saved"
        );
        Ok(self.cart.insert(cart))
    }

    /// Remove one line and persist the result.
    ///
    /// Out-of-range indices (or no cart at all) are a no-op that returns the
    /// current cart untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be written.
    pub fn remove_item(
        &mut self,
        group_index: usize,
        item_index: usize,
    ) -> Result<Option<&Cart>, StorageError> {
        let Some(current) = self.cart.as_ref() else {
            return Ok(None);
        };

        if current.item(group_index, item_index).is_none() {
            debug!(group_index, item_index, "No cart line at index, nothing removed");
            return Ok(self.cart.as_ref());
        }

        let mut next = current.clone();
        next.remove_item(group_index, item_index);
        self.save(next).map(Some)
    }

    /// Delete the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(CART_KEY)?;
        self.cart = None;
        Ok(())
    }

    /// The stored bearer token, if there is a non-blank one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn token(&self) -> Result<Option<BearerToken>, StorageError> {
        Ok(self
            .storage
            .get(TOKEN_KEY)?
            .as_deref()
            .and_then(BearerToken::non_empty))
    }

    /// Store a bearer token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_token(&mut self, token: &BearerToken) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token.expose())
    }

    /// Forget the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_token(&mut self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)
    }

    /// Consume the store, returning the underlying storage.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

/// Read and parse the persisted cart. Corrupt or unreadable data counts as
/// no cart.
fn read_cart(storage: &impl KeyValueStore) -> Option<Cart> {
    let raw = match storage.get(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart, treating as empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(cart) => Some(cart),
        Err(e) => {
            warn!(error = %e, "Persisted cart is corrupt, treating as empty");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use pasar_core::{CartGroup, CartItem, ItemId, Money, ProductSnapshot, Quantity, Shop};
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    fn line(id: i64, qty: u32, subtotal: u64) -> CartItem {
        CartItem {
            id: ItemId::Number(id),
            product: ProductSnapshot {
                title: format!("Produk {id}"),
                images: vec![format!("https://cdn.example/{id}.jpg")],
            },
            qty: Quantity::new(qty).unwrap(),
            subtotal: Money::from_units(subtotal),
        }
    }

    fn shop(slug: &str) -> Shop {
        Shop {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
        }
    }

    fn sample_cart() -> Cart {
        Cart::new(vec![CartGroup::new(
            shop("a"),
            vec![line(1, 2, 100), line(2, 1, 50)],
        )])
        .unwrap()
    }

    fn seeded() -> CartStore<MemoryStore> {
        let mut store = CartStore::open(MemoryStore::new());
        store.save(sample_cart()).unwrap();
        store
    }

    #[test]
    fn test_overflowing_stored_total_loads_as_none() {
        let raw = r#"{"groups": [{"shop": {"name": "A", "slug": "a"}, "items": [
            {"id": 1, "product": {"title": "T", "images": []}, "qty": 1, "subtotal": 5e28},
            {"id": 2, "product": {"title": "U", "images": []}, "qty": 1, "subtotal": 5e28}
        ]}], "grandTotal": 0}"#;

        let mut store = CartStore::open(MemoryStore::new().with_entry(CART_KEY, raw));
        assert!(store.cart().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_absent_is_none() {
        let mut store = CartStore::open(MemoryStore::new());
        assert!(store.load().is_none());
        assert!(store.cart().is_none());
    }

    #[test]
    fn test_load_corrupt_is_none() {
        let storage = MemoryStore::new().with_entry(CART_KEY, "{not json");
        let mut store = CartStore::open(storage);
        assert!(store.cart().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_wrong_shape_is_none() {
        let storage = MemoryStore::new().with_entry(CART_KEY, r#"{"groups": 5}"#);
        assert!(CartStore::open(storage).cart().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = seeded();
        let loaded = store.load().cloned().unwrap();
        assert_eq!(loaded, sample_cart());
    }

    #[test]
    fn test_save_persists_wire_shape() {
        let store = seeded();
        let raw = store.into_inner().get(CART_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["grandTotal"], serde_json::json!(150.0));
        assert_eq!(value["groups"][0]["shop"]["slug"], "a");
        assert_eq!(value["groups"][0]["items"][1]["id"], 2);
    }

    #[test]
    fn test_save_is_last_writer_wins() {
        let mut store = seeded();
        let replacement = Cart::new(vec![CartGroup::new(shop("b"), vec![line(9, 1, 5)])]).unwrap();
        store.save(replacement.clone()).unwrap();

        assert_eq!(store.load().unwrap(), &replacement);
    }

    #[test]
    fn test_stored_grand_total_is_recomputed() {
        let raw = r#"{"groups":[{"shop":{"name":"A","slug":"a"},
            "items":[{"id":1,"product":{"title":"T","images":[]},"qty":2,"subtotal":100}]}],
            "grandTotal":999}"#;
        let store = CartStore::open(MemoryStore::new().with_entry(CART_KEY, raw));

        assert_eq!(store.cart().unwrap().grand_total(), Money::from_units(100));
    }

    #[test]
    fn test_remove_item_persists_and_recomputes() {
        let mut store = seeded();
        let cart = store.remove_item(0, 0).unwrap().cloned().unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.groups()[0].items()[0].id, ItemId::Number(2));
        assert_eq!(cart.grand_total().amount(), Decimal::from(50));
        assert_eq!(store.load().unwrap(), &cart);
    }

    #[test]
    fn test_remove_item_out_of_range_is_noop() {
        let mut store = seeded();

        assert_eq!(store.remove_item(0, 7).unwrap(), Some(&sample_cart()));
        assert_eq!(store.remove_item(3, 0).unwrap(), Some(&sample_cart()));
        assert_eq!(store.load().unwrap(), &sample_cart());
    }

    #[test]
    fn test_remove_item_without_cart_is_noop() {
        let mut store = CartStore::open(MemoryStore::new());
        assert_eq!(store.remove_item(0, 0).unwrap(), None);
        assert!(store.into_inner().get(CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_removing_last_line_leaves_empty_cart() {
        let mut store = CartStore::open(MemoryStore::new());
        store
            .save(Cart::new(vec![CartGroup::new(shop("a"), vec![line(1, 1, 10)])]).unwrap())
            .unwrap();

        let cart = store.remove_item(0, 0).unwrap().cloned().unwrap();
        assert!(cart.groups().is_empty());
        assert_eq!(cart.grand_total(), Money::ZERO);
    }

    #[test]
    fn test_clear_removes_cart() {
        let mut store = seeded();
        store.clear().unwrap();

        assert!(store.cart().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_token_round_trip() {
        let mut store = CartStore::open(MemoryStore::new());
        assert!(store.token().unwrap().is_none());

        store.set_token(&BearerToken::new("tok_123")).unwrap();
        assert_eq!(store.token().unwrap().unwrap().expose(), "tok_123");

        store.clear_token().unwrap();
        assert!(store.token().unwrap().is_none());
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let store = CartStore::open(MemoryStore::new().with_entry(TOKEN_KEY, "   "));
        assert!(store.token().unwrap().is_none());
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = CartStore::open(FileStore::open(dir.path()).unwrap());
            store.save(sample_cart()).unwrap();
        }

        let store = CartStore::open(FileStore::open(dir.path()).unwrap());
        assert_eq!(store.cart(), Some(&sample_cart()));
    }
}
