//! Cart commands.
//!
//! `remove` deletes the line on the backend first; the local cart only
//! changes once the backend has accepted the delete.

use pasar_core::{ProductId, Quantity};
use pasar_storefront::cart::{Addition, CartError, Removal, ValidationError};

use crate::context::{CliError, Context};
use crate::render;

/// Print the persisted cart.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context) {
    // An unreadable store renders the same as an empty cart
    let cart = match ctx.store() {
        Ok(store) => store.cart().cloned(),
        Err(e) => {
            tracing::warn!(error = %e, dir = %ctx.data_dir().display(), "Cart store unavailable");
            None
        }
    };
    println!("{}", render::cart(cart.as_ref()));
}

/// Add a product to the remote cart.
#[allow(clippy::print_stdout)]
pub async fn add(ctx: &Context, product_id: &str, qty: u32) -> Result<(), CliError> {
    let qty = Quantity::new(qty).map_err(|e| CliError::Rejected(e.to_string()))?;
    let mut service = ctx.cart_service()?;

    match service
        .add_line(&ProductId::new(product_id), qty)
        .await
        .map_err(not_logged_in)?
    {
        Addition::Replaced(cart) => println!("{}", render::cart(Some(&cart))),
        Addition::Acknowledged(_) => println!("Added {qty} x product {product_id} to your cart"),
    }
    Ok(())
}

/// Remove a line, using the 1-based numbers printed by `cart show`.
#[allow(clippy::print_stdout)]
pub async fn remove(ctx: &Context, group: u32, item: u32) -> Result<(), CliError> {
    let (Some(group_index), Some(item_index)) = (to_index(group), to_index(item)) else {
        return Err(CliError::Rejected("Line numbers start at 1".to_string()));
    };

    let mut service = ctx.cart_service()?;
    match service
        .remove_line(group_index, item_index)
        .await
        .map_err(not_logged_in)?
    {
        Removal::Removed { cart, removed, .. } => {
            println!("{}", render::removed(&removed));
            println!();
            println!("{}", render::cart(Some(&cart)));
        }
        Removal::Unchanged(cart) => {
            println!("No line {group}.{item} in your cart");
            println!();
            println!("{}", render::cart(cart.as_ref()));
        }
    }
    Ok(())
}

/// Reset the persisted cart.
#[allow(clippy::print_stdout)]
pub fn clear(ctx: &Context) -> Result<(), CliError> {
    ctx.store()?.clear()?;
    println!("Cart cleared");
    Ok(())
}

fn to_index(number: u32) -> Option<usize> {
    number
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
}

fn not_logged_in(err: CartError) -> CliError {
    match err {
        CartError::Validation(ValidationError::MissingToken) => CliError::NotLoggedIn,
        other => CliError::Cart(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(0), None);
        assert_eq!(to_index(1), Some(0));
        assert_eq!(to_index(3), Some(2));
    }

    #[test]
    fn test_missing_token_means_not_logged_in() {
        assert!(matches!(
            not_logged_in(CartError::Validation(ValidationError::MissingToken)),
            CliError::NotLoggedIn
        ));
        assert!(matches!(
            not_logged_in(CartError::Validation(ValidationError::MissingItemId)),
            CliError::Cart(_)
        ));
    }
}
