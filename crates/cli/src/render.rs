//! Plain-text rendering of carts for the terminal.

use pasar_core::{Cart, CartItem};

const EMPTY_CART: &str = "Your cart is empty.";

/// Render a cart, or the empty-cart view when there is nothing to show.
///
/// Shops and lines are numbered from 1; `pasar cart remove` takes the same
/// numbers.
pub fn cart(cart: Option<&Cart>) -> String {
    let Some(cart) = cart.filter(|cart| !cart.is_empty()) else {
        return EMPTY_CART.to_string();
    };

    let mut lines = Vec::new();
    for (g, group) in cart.groups().iter().enumerate() {
        let shop = group.shop();
        lines.push(format!("[{}] {} ({})", g + 1, shop.name, shop.slug));
        for (i, item) in group.items().iter().enumerate() {
            lines.push(format!("    {}. {}", i + 1, line(item)));
        }
        lines.push(format!("    Subtotal: {}", group.subtotal().display_idr()));
        lines.push(String::new());
    }
    lines.push(format!(
        "Total ({} items): {}",
        cart.total_quantity(),
        cart.grand_total().display_idr()
    ));
    lines.join("\n")
}

fn line(item: &CartItem) -> String {
    format!(
        "{}  x{}  {}",
        item.product.title,
        item.qty,
        item.subtotal.display_idr()
    )
}

/// One-line summary of a removed line.
pub fn removed(item: &CartItem) -> String {
    format!("Removed {}", line(item))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pasar_core::{CartGroup, ItemId, Money, ProductSnapshot, Quantity, Shop};

    use super::*;

    fn item(id: i64, title: &str, qty: u32, subtotal: u64) -> CartItem {
        CartItem {
            id: ItemId::Number(id),
            product: ProductSnapshot {
                title: title.to_string(),
                images: Vec::new(),
            },
            qty: Quantity::new(qty).unwrap(),
            subtotal: Money::from_units(subtotal),
        }
    }

    #[test]
    fn test_empty_views() {
        assert_eq!(cart(None), EMPTY_CART);
        assert_eq!(cart(Some(&Cart::empty())), EMPTY_CART);
    }

    #[test]
    fn test_renders_groups_and_totals() {
        let c = Cart::new(vec![CartGroup::new(
            Shop {
                name: "Toko A".to_string(),
                slug: "toko-a".to_string(),
            },
            vec![item(1, "Kopi", 2, 100_000), item(2, "Teh", 1, 50_000)],
        )])
        .unwrap();

        let text = cart(Some(&c));
        assert!(text.contains("[1] Toko A (toko-a)"));
        assert!(text.contains("1. Kopi  x2  Rp100.000"));
        assert!(text.contains("2. Teh  x1  Rp50.000"));
        assert!(text.ends_with("Total (3 items): Rp150.000"));
    }

    #[test]
    fn test_removed_summary() {
        assert_eq!(removed(&item(1, "Kopi", 2, 100)), "Removed Kopi  x2  Rp100");
    }
}
