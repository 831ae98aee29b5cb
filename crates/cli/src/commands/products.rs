//! Catalog commands.

use pasar_core::ProductId;
use serde_json::Value;

use crate::context::{CliError, Context};

/// Print one page of products.
#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context, page: u32) -> Result<(), CliError> {
    let products = ctx.backend()?.list_products(page).await?;
    println!("{}", pretty(&products));
    Ok(())
}

/// Print one product.
#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, id: &str) -> Result<(), CliError> {
    let product = ctx.backend()?.get_product(&ProductId::new(id)).await?;
    println!("{}", pretty(&product));
    Ok(())
}

/// Print the full catalog.
#[allow(clippy::print_stdout)]
pub async fn catalog(ctx: &Context) -> Result<(), CliError> {
    let catalog = ctx.backend()?.get_catalog().await?;
    println!("{}", pretty(&catalog));
    Ok(())
}

// Product payloads are opaque; print them as the backend sent them.
pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
