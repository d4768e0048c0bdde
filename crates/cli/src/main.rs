//! Marketplace Cart CLI - Inspect and edit a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (repeat to bump its quantity)
//! cart-cli add --id p1 --title Shirt --image-url https://img/p1.png --price 10
//!
//! # Change quantities
//! cart-cli increment p1
//! cart-cli decrement p1
//!
//! # Show the cart
//! cart-cli list
//! cart-cli list --json
//! ```
//!
//! # Commands
//!
//! - `add` - Add one unit of a product
//! - `increment` / `decrement` - Adjust an existing line item
//! - `list` - Print the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marketplace_cart::CartConfig;
use marketplace_cart_core::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Marketplace Cart CLI tools")]
struct Cli {
    /// Directory holding the file-backed store (overrides `CART_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Key the cart is stored under (overrides `CART_STORAGE_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    /// Use the `PostgreSQL` store from `CART_DATABASE_URL`
    #[cfg(feature = "postgres")]
    #[arg(long, global = true)]
    postgres: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add {
        /// Product id
        #[arg(long)]
        id: String,

        /// Display title
        #[arg(long)]
        title: String,

        /// Image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,
    },
    /// Add one unit to an existing line item
    Increment {
        /// Product id
        id: String,
    },
    /// Remove one unit from an existing line item
    Decrement {
        /// Product id
        id: String,
    },
    /// Print the cart
    List {
        /// Print the persisted JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for the cart crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marketplace_cart=info,marketplace_cart_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(key) = cli.key {
        config = config.with_storage_key(key)?;
    }

    #[cfg(feature = "postgres")]
    let store = if cli.postgres {
        commands::open_postgres(&config).await?
    } else {
        commands::open_file_store(&config)
    };
    #[cfg(not(feature = "postgres"))]
    let store = commands::open_file_store(&config);

    let provider = marketplace_cart::CartProvider::mount(store, &config).await;

    let outcome = provider
        .scope(async {
            match cli.command {
                Commands::Add {
                    id,
                    title,
                    image_url,
                    price,
                } => commands::cart::add(id, title, image_url, price),
                Commands::Increment { id } => commands::cart::increment(&id),
                Commands::Decrement { id } => commands::cart::decrement(&id),
                Commands::List { json } => commands::cart::list(json),
            }
        })
        .await;

    provider.shutdown().await;
    outcome
}
