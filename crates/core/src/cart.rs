//! Shop-grouped shopping cart.
//!
//! A [`Cart`] is an ordered list of [`CartGroup`]s, one per originating shop,
//! plus a grand total. Two invariants hold for every `Cart` value:
//!
//! - no group is empty
//! - `grand_total` equals the sum of every item subtotal
//!
//! Both are re-established by [`Cart::new`] and after every mutation, and also
//! on deserialization: a stored or received `grandTotal` is never trusted.
//! A cart whose subtotals cannot be summed without overflow is rejected.
//!
//! Subtotals themselves come from the backend. No unit price is tracked, so
//! they are never recomputed from quantities.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Money, MoneyError};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities must be at least one.
    #[error("quantity must be at least 1")]
    Zero,
}

/// Number of units on a cart line. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] if `qty` is zero.
    pub const fn new(qty: u32) -> Result<Self, QuantityError> {
        match NonZeroU32::new(qty) {
            Some(qty) => Ok(Self(qty)),
            None => Err(QuantityError::Zero),
        }
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(qty: u32) -> Result<Self, Self::Error> {
        Self::new(qty)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product details captured on the cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductSnapshot {
    /// The first image, used as the line thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ItemId,
    pub product: ProductSnapshot,
    pub qty: Quantity,
    /// Line amount as reported by the backend.
    pub subtotal: Money,
}

/// The shop a group of lines was bought from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub slug: String,
}

/// Cart lines belonging to one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartGroup {
    shop: Shop,
    #[serde(default)]
    items: Vec<CartItem>,
}

impl CartGroup {
    #[must_use]
    pub const fn new(shop: Shop, items: Vec<CartItem>) -> Self {
        Self { shop, items }
    }

    #[must_use]
    pub const fn shop(&self) -> &Shop {
        &self.shop
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of this group's line subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|item| item.subtotal).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CartRecord")]
pub struct Cart {
    groups: Vec<CartGroup>,
    grand_total: Money,
}

/// Wire shape of a cart. The stored grand total is ignored.
#[derive(Deserialize)]
struct CartRecord {
    #[serde(default)]
    groups: Vec<CartGroup>,
}

impl TryFrom<CartRecord> for Cart {
    type Error = MoneyError;

    fn try_from(record: CartRecord) -> Result<Self, Self::Error> {
        Self::new(record.groups)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty()
    }
}

impl Cart {
    /// Build a cart, dropping empty groups and deriving the grand total.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the subtotals do not fit in a
    /// single amount.
    pub fn new(groups: Vec<CartGroup>) -> Result<Self, MoneyError> {
        let mut cart = Self {
            groups,
            grand_total: Money::ZERO,
        };
        cart.groups.retain(|group| !group.is_empty());
        cart.grand_total = cart.compute_grand_total()?;
        Ok(cart)
    }

    /// A cart with no groups.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            groups: Vec::new(),
            grand_total: Money::ZERO,
        }
    }

    #[must_use]
    pub fn groups(&self) -> &[CartGroup] {
        &self.groups
    }

    #[must_use]
    pub const fn grand_total(&self) -> Money {
        self.grand_total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of lines across all groups.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.groups
            .iter()
            .flat_map(|group| &group.items)
            .map(|item| u64::from(item.qty.get()))
            .sum()
    }

    /// Look up a line by position.
    #[must_use]
    pub fn item(&self, group_index: usize, item_index: usize) -> Option<&CartItem> {
        self.groups.get(group_index)?.items.get(item_index)
    }

    /// Sum of every line subtotal, computed from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the sum is not representable.
    pub fn compute_grand_total(&self) -> Result<Money, MoneyError> {
        Money::checked_sum(
            self.groups
                .iter()
                .flat_map(|group| &group.items)
                .map(|item| &item.subtotal),
        )
    }

    /// Remove the line at the given position.
    ///
    /// Returns `None` and leaves the cart untouched if either index is out of
    /// range. Otherwise the group is dropped when it becomes empty and the
    /// grand total is recomputed.
    pub fn remove_item(&mut self, group_index: usize, item_index: usize) -> Option<CartItem> {
        let group = self.groups.get_mut(group_index)?;
        if item_index >= group.items.len() {
            return None;
        }
        let removed = group.items.remove(item_index);
        self.groups.retain(|group| !group.is_empty());
        // The remaining lines are a subset of a sum that already fit
        self.grand_total = self.groups.iter().map(CartGroup::subtotal).sum();
        Some(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: i64, qty: u32, subtotal: u64) -> CartItem {
        CartItem {
            id: ItemId::from(id),
            product: ProductSnapshot {
                title: format!("Product {id}"),
                images: vec![format!("https://cdn.example/{id}.jpg")],
            },
            qty: Quantity::new(qty).unwrap(),
            subtotal: Money::from_units(subtotal),
        }
    }

    fn shop(name: &str) -> Shop {
        Shop {
            name: name.to_owned(),
            slug: name.to_lowercase(),
        }
    }

    fn two_shop_cart() -> Cart {
        Cart::new(vec![
            CartGroup::new(shop("A"), vec![item(1, 2, 100), item(2, 1, 50)]),
            CartGroup::new(shop("B"), vec![item(3, 4, 400)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_derives_total_and_drops_empty_groups() {
        let cart = Cart::new(vec![
            CartGroup::new(shop("A"), vec![item(1, 1, 10)]),
            CartGroup::new(shop("Empty"), vec![]),
            CartGroup::new(shop("B"), vec![item(2, 3, 30)]),
        ])
        .unwrap();

        assert_eq!(cart.groups().len(), 2);
        assert_eq!(cart.grand_total(), Money::from_units(40));
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_remove_first_item_scenario() {
        let mut cart = Cart::new(vec![CartGroup::new(
            shop("A"),
            vec![item(1, 2, 100), item(2, 1, 50)],
        )])
        .unwrap();
        assert_eq!(cart.grand_total(), Money::from_units(150));

        let removed = cart.remove_item(0, 0).unwrap();

        assert_eq!(removed.id, ItemId::from(1));
        assert_eq!(cart.groups().len(), 1);
        assert_eq!(cart.groups()[0].items(), &[item(2, 1, 50)]);
        assert_eq!(cart.grand_total(), Money::from_units(50));
    }

    #[test]
    fn test_removing_only_item_removes_group() {
        let mut cart = Cart::new(vec![CartGroup::new(shop("A"), vec![item(1, 1, 10)])]).unwrap();

        cart.remove_item(0, 0).unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.grand_total(), Money::ZERO);
    }

    #[test]
    fn test_remove_leaves_other_groups_untouched() {
        let mut cart = two_shop_cart();
        let other = cart.groups()[1].clone();

        cart.remove_item(0, 1).unwrap();

        assert_eq!(cart.groups()[0].items().len(), 1);
        assert_eq!(cart.groups()[1], other);
        assert_eq!(cart.grand_total(), Money::from_units(500));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut cart = two_shop_cart();
        let before = cart.clone();

        assert!(cart.remove_item(5, 0).is_none());
        assert!(cart.remove_item(0, 2).is_none());
        assert!(cart.remove_item(1, usize::MAX).is_none());

        assert_eq!(cart, before);
    }

    #[test]
    fn test_total_matches_sum_after_every_removal() {
        let mut cart = two_shop_cart();
        while !cart.is_empty() {
            cart.remove_item(0, 0).unwrap();
            assert_eq!(Ok(cart.grand_total()), cart.compute_grand_total());
            assert!(cart.groups().iter().all(|group| !group.is_empty()));
        }
        assert_eq!(cart.grand_total(), Money::ZERO);
    }

    #[test]
    fn test_deserialize_recomputes_stale_total() {
        let json = r#"{
            "groups": [
                {"shop": {"name": "A", "slug": "a"},
                 "items": [
                    {"id": 1, "product": {"title": "Kopi", "images": []}, "qty": 2, "subtotal": 100},
                    {"id": "x-2", "product": {"title": "Teh"}, "qty": 1, "subtotal": 50}
                 ]},
                {"shop": {"name": "B", "slug": "b"}, "items": []}
            ],
            "grandTotal": 999
        }"#;

        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.grand_total(), Money::from_units(150));
        assert_eq!(cart.groups().len(), 1);
        assert_eq!(cart.item(0, 1).unwrap().id, ItemId::from("x-2"));
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let json = r#"{"groups": [{"shop": {"name": "A", "slug": "a"},
            "items": [{"id": 1, "product": {"title": "T"}, "qty": 0, "subtotal": 1}]}]}"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_overflowing_subtotals_are_rejected() {
        let huge = Money::new(rust_decimal::Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0))
            .unwrap();
        let mut first = item(1, 1, 0);
        first.subtotal = huge;
        let mut second = item(2, 1, 0);
        second.subtotal = huge;

        assert_eq!(
            Cart::new(vec![CartGroup::new(shop("A"), vec![first, second])]),
            Err(MoneyError::Overflow)
        );

        let json = r#"{"groups": [{"shop": {"name": "A", "slug": "a"}, "items": [
            {"id": 1, "product": {"title": "T"}, "qty": 1, "subtotal": 5e28},
            {"id": 2, "product": {"title": "U"}, "qty": 1, "subtotal": 5e28}]}]}"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_serialized_shape_uses_camel_case() {
        let cart = Cart::new(vec![CartGroup::new(shop("A"), vec![item(1, 2, 100)])]).unwrap();
        let value = serde_json::to_value(&cart).unwrap();

        assert_eq!(value["grandTotal"], serde_json::json!(100.0));
        assert_eq!(value["groups"][0]["shop"]["slug"], "a");
        assert_eq!(value["groups"][0]["items"][0]["qty"], 2);
        assert_eq!(value["groups"][0]["items"][0]["id"], 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let cart = two_shop_cart();
        let json = serde_json::to_string(&cart).unwrap();
        let parsed: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_primary_image() {
        let line = item(1, 1, 1);
        assert_eq!(line.product.primary_image(), Some("https://cdn.example/1.jpg"));
    }
}
