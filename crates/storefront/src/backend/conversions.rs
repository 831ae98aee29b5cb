//! Cart payload decoding.
//!
//! The backend's cart JSON is loosely typed: ids may be numbers or strings,
//! quantities and subtotals are arbitrary JSON numbers, and the cart may be
//! bare or wrapped in a `{"data": ...}` envelope. Everything passes through
//! the DTOs here and a single [`TryFrom`] step before it becomes a
//! [`Cart`].

use std::str::FromStr;

use pasar_core::{Cart, CartGroup, CartItem, ItemId, Money, ProductSnapshot, Quantity, Shop};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::warn;

/// Reasons a cart payload is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartDecodeError {
    #[error("item {group}/{item} has no id")]
    MissingItemId { group: usize, item: usize },

    #[error("item {group}/{item} has invalid quantity {qty}")]
    InvalidQuantity { group: usize, item: usize, qty: String },

    #[error("item {group}/{item} has invalid subtotal {subtotal}")]
    InvalidSubtotal {
        group: usize,
        item: usize,
        subtotal: String,
    },

    #[error("group {group} has no shop slug")]
    MissingShopSlug { group: usize },

    #[error("line subtotals overflow the grand total")]
    TotalOverflow,
}

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub groups: Vec<CartGroupDto>,
    #[serde(default)]
    pub grand_total: Option<Number>,
}

#[derive(Debug, Deserialize)]
pub struct CartGroupDto {
    pub shop: ShopDto,
    #[serde(default)]
    pub items: Vec<CartItemDto>,
}

#[derive(Debug, Deserialize)]
pub struct ShopDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct CartItemDto {
    #[serde(default)]
    pub id: Option<ItemId>,
    pub product: ProductDto,
    pub qty: Number,
    pub subtotal: Number,
}

#[derive(Debug, Deserialize)]
pub struct ProductDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
}

// =============================================================================
// Conversions
// =============================================================================

impl TryFrom<CartDto> for Cart {
    type Error = CartDecodeError;

    fn try_from(dto: CartDto) -> Result<Self, Self::Error> {
        let reported_total = dto.grand_total.as_ref().and_then(parse_decimal);

        let groups = dto
            .groups
            .into_iter()
            .enumerate()
            .map(|(g, group)| convert_group(g, group))
            .collect::<Result<Vec<_>, _>>()?;
        let cart = Self::new(groups).map_err(|_| CartDecodeError::TotalOverflow)?;

        if let Some(reported) = reported_total
            && reported != cart.grand_total().amount()
        {
            warn!(
                reported = %reported,
                computed = %cart.grand_total(),
                "backend grand total disagrees with line subtotals, using computed total"
            );
        }

        Ok(cart)
    }
}

fn convert_group(g: usize, dto: CartGroupDto) -> Result<CartGroup, CartDecodeError> {
    if dto.shop.slug.trim().is_empty() {
        return Err(CartDecodeError::MissingShopSlug { group: g });
    }

    let items = dto
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| convert_item(g, i, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CartGroup::new(
        Shop {
            name: dto.shop.name,
            slug: dto.shop.slug,
        },
        items,
    ))
}

fn convert_item(g: usize, i: usize, dto: CartItemDto) -> Result<CartItem, CartDecodeError> {
    let id = dto
        .id
        .filter(|id| !id.is_blank())
        .ok_or(CartDecodeError::MissingItemId { group: g, item: i })?;

    let qty = dto
        .qty
        .as_u64()
        .and_then(|qty| u32::try_from(qty).ok())
        .and_then(|qty| Quantity::new(qty).ok())
        .ok_or_else(|| CartDecodeError::InvalidQuantity {
            group: g,
            item: i,
            qty: dto.qty.to_string(),
        })?;

    let subtotal = parse_decimal(&dto.subtotal)
        .and_then(|amount| Money::new(amount).ok())
        .ok_or_else(|| CartDecodeError::InvalidSubtotal {
            group: g,
            item: i,
            subtotal: dto.subtotal.to_string(),
        })?;

    Ok(CartItem {
        id,
        product: ProductSnapshot {
            title: dto.product.title,
            images: dto.product.images,
        },
        qty,
        subtotal,
    })
}

fn parse_decimal(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Decode a backend response into a cart, if it carries one.
///
/// Accepts a bare cart object or one wrapped in `{"data": ...}`. Returns
/// `None` for acknowledgements that carry no cart, and for carts that fail
/// validation (logged).
#[must_use]
pub fn decode_cart_payload(payload: &Value) -> Option<Cart> {
    let candidate = if payload.get("groups").is_some() {
        payload
    } else {
        payload.get("data").filter(|data| data.get("groups").is_some())?
    };

    let dto = match CartDto::deserialize(candidate) {
        Ok(dto) => dto,
        Err(e) => {
            warn!(error = %e, "backend cart payload has unexpected shape");
            return None;
        }
    };

    match Cart::try_from(dto) {
        Ok(cart) => Some(cart),
        Err(e) => {
            warn!(error = %e, "backend cart payload failed validation");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "groups": [{
                "shop": {"name": "Toko A", "slug": "toko-a"},
                "items": [
                    {"id": 1, "product": {"title": "Kopi", "images": ["k.jpg"]}, "qty": 2, "subtotal": 100},
                    {"id": "2", "product": {"title": "Teh"}, "qty": 1, "subtotal": 50.5}
                ]
            }],
            "grandTotal": 150.5
        })
    }

    #[test]
    fn test_decodes_bare_cart() {
        let cart = decode_cart_payload(&sample()).unwrap();

        assert_eq!(cart.groups().len(), 1);
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.grand_total().amount(), Decimal::from_str("150.5").unwrap());
        assert_eq!(cart.item(0, 1).unwrap().id, ItemId::from("2"));
    }

    #[test]
    fn test_decodes_enveloped_cart() {
        let payload = json!({"success": true, "message": "ok", "data": sample()});
        assert!(decode_cart_payload(&payload).is_some());
    }

    #[test]
    fn test_acknowledgement_is_not_a_cart() {
        assert!(decode_cart_payload(&json!({"message": "deleted"})).is_none());
        assert!(decode_cart_payload(&json!({"data": {"id": 3}})).is_none());
        assert!(decode_cart_payload(&Value::Null).is_none());
    }

    #[test]
    fn test_rejects_missing_item_id() {
        let dto: CartDto = serde_json::from_value(json!({
            "groups": [{"shop": {"name": "A", "slug": "a"},
                        "items": [{"product": {"title": "T"}, "qty": 1, "subtotal": 1}]}]
        }))
        .unwrap();

        assert_eq!(
            Cart::try_from(dto),
            Err(CartDecodeError::MissingItemId { group: 0, item: 0 })
        );
    }

    #[test]
    fn test_rejects_bad_quantity_and_subtotal() {
        let dto: CartDto = serde_json::from_value(json!({
            "groups": [{"shop": {"name": "A", "slug": "a"},
                        "items": [{"id": 1, "product": {"title": "T"}, "qty": 0, "subtotal": 1}]}]
        }))
        .unwrap();
        assert!(matches!(
            Cart::try_from(dto),
            Err(CartDecodeError::InvalidQuantity { .. })
        ));

        let dto: CartDto = serde_json::from_value(json!({
            "groups": [{"shop": {"name": "A", "slug": "a"},
                        "items": [{"id": 1, "product": {"title": "T"}, "qty": 1, "subtotal": -3}]}]
        }))
        .unwrap();
        assert!(matches!(
            Cart::try_from(dto),
            Err(CartDecodeError::InvalidSubtotal { .. })
        ));
    }

    #[test]
    fn test_rejects_overflowing_total() {
        let dto: CartDto = serde_json::from_value(json!({
            "groups": [{"shop": {"name": "A", "slug": "a"}, "items": [
                {"id": 1, "product": {"title": "T"}, "qty": 1, "subtotal": 5e28},
                {"id": 2, "product": {"title": "U"}, "qty": 1, "subtotal": 5e28}
            ]}]
        }))
        .unwrap();

        assert_eq!(Cart::try_from(dto), Err(CartDecodeError::TotalOverflow));
    }

    #[test]
    fn test_rejects_missing_shop_slug() {
        let dto: CartDto = serde_json::from_value(json!({
            "groups": [{"shop": {"name": "A"}, "items": []}]
        }))
        .unwrap();
        assert_eq!(
            Cart::try_from(dto),
            Err(CartDecodeError::MissingShopSlug { group: 0 })
        );
    }
}
