//! Pasar CLI - shopper tools against the Pasar backend.
//!
//! # Usage
//!
//! ```bash
//! # Log in (stores the token in the data directory)
//! pasar login -e budi@toko.id -p rahasia123
//!
//! # Browse products and add one to the cart
//! pasar products list --page 2
//! pasar cart add 12 --qty 2
//!
//! # Show the cart and remove the first line of the first shop
//! pasar cart show
//! pasar cart remove 1 1
//! ```
//!
//! # Environment Variables
//!
//! - `PASAR_BACKEND_URL` - Base URL of the backend API (required for network commands)
//! - `PASAR_BACKEND_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `PASAR_DATA_DIR` - Where the cart and token are kept (default: platform data dir + `/pasar`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod render;

use context::{CliError, Context};

#[derive(Parser)]
#[command(name = "pasar")]
#[command(author, version, about = "Pasar shopper CLI")]
struct Cli {
    /// Directory holding the persisted cart and token
    #[arg(long, global = true, env = "PASAR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the bearer token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored bearer token
    Logout,
    /// Create a shopper account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Avatar image to upload
        #[arg(long)]
        avatar: Option<PathBuf>,

        /// Avatar URL, used when no file is uploaded
        #[arg(long, conflicts_with = "avatar")]
        avatar_url: Option<String>,
    },
    /// Register a shop for the logged-in seller
    OpenStore {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        slug: String,

        #[arg(short, long)]
        address: String,

        /// Shop logo image to upload
        #[arg(long)]
        logo: Option<PathBuf>,
    },
    /// List shops
    Shops,
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List one page of products
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show one product
    Show { id: String },
    /// Print the whole catalog
    Catalog,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the persisted cart
    Show,
    /// Add a product to the cart
    Add {
        product_id: String,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        qty: u32,
    },
    /// Remove a line: shop number, then line number within the shop (as shown by `cart show`)
    Remove {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        group: u32,

        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        item: u32,
    },
    /// Reset the persisted cart
    Clear,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout is for command output
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pasar_cli=info,pasar_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::new(cli.data_dir)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, password).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Register {
            name,
            email,
            password,
            avatar,
            avatar_url,
        } => {
            commands::auth::register(&ctx, name, &email, password, avatar.as_deref(), avatar_url)
                .await?;
        }
        Commands::OpenStore {
            name,
            slug,
            address,
            logo,
        } => {
            commands::shop::open_store(&ctx, name, slug, address, logo.as_deref()).await?;
        }
        Commands::Shops => commands::shop::list(&ctx).await?,
        Commands::Products { action } => match action {
            ProductsAction::List { page } => commands::products::list(&ctx, page).await?,
            ProductsAction::Show { id } => commands::products::show(&ctx, &id).await?,
            ProductsAction::Catalog => commands::products::catalog(&ctx).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { product_id, qty } => {
                commands::cart::add(&ctx, &product_id, qty).await?;
            }
            CartAction::Remove { group, item } => {
                commands::cart::remove(&ctx, group, item).await?;
            }
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
    }
    Ok(())
}
