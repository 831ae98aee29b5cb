//! Shop listing and seller onboarding.

use std::path::Path;

use pasar_storefront::backend::ShopRegistration;
use serde_json::Value;

use super::auth::require_token;
use crate::context::{CliError, Context, read_upload};

/// Print the shop listing.
#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context) -> Result<(), CliError> {
    let shops = ctx.backend()?.list_shops().await?;
    println!("{}", super::products::pretty(&shops));
    Ok(())
}

/// Register a shop for the logged-in seller.
#[allow(clippy::print_stdout)]
pub async fn open_store(
    ctx: &Context,
    name: String,
    slug: String,
    address: String,
    logo: Option<&Path>,
) -> Result<(), CliError> {
    let token = require_token(ctx)?;
    let logo = match logo {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };

    let shop = ShopRegistration {
        name,
        slug,
        address,
        logo,
    };
    let response = ctx.backend()?.register_shop(&shop, &token).await?;

    if response.get("success").and_then(Value::as_bool) == Some(false) {
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(CliError::Rejected(super::auth::rejection_message(
            message,
            "Shop registration failed",
        )));
    }

    println!("Shop {} ({}) is open", shop.name, shop.slug);
    Ok(())
}
