//! Screw Plus CLI - Catalog browsing and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Search products in a local seed file
//! sp-cli --seed catalog.yaml search "denim"
//!
//! # List one category from the live catalog
//! sp-cli browse --category Women
//!
//! # Resolve the price of a size/color variant
//! sp-cli --seed catalog.yaml price 3 --size M --color Black
//!
//! # Discount percentage between MRP and sale price
//! sp-cli discount 1299 799
//!
//! # Import a seed file into Firestore
//! sp-cli seed catalog.yaml
//! ```
//!
//! # Commands
//!
//! - `search` - Case-insensitive search over title, category and brand
//! - `browse` - List products in a category
//! - `price` - Resolve a variant price
//! - `discount` - Compute a rounded discount percentage
//! - `seed` - Import a catalog seed into Firestore

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use screw_plus_storefront::store::ALL_CATEGORIES;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(author, version, about = "Screw Plus CLI tools")]
struct Cli {
    /// Read the catalog from a YAML or JSON seed file instead of Firestore
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products by title, category or brand
    Search {
        /// Search text
        query: String,
    },
    /// List products in a category
    Browse {
        /// Category name
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Show the price of a product variant
    Price {
        /// Product id
        product_id: String,

        /// Variant size
        #[arg(short, long)]
        size: Option<String>,

        /// Variant color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Compute the discount percentage between MRP and sale price
    Discount {
        /// Original price (MRP)
        mrp: String,

        /// Sale price
        sale: String,
    },
    /// Import a catalog seed file into Firestore
    Seed {
        /// Path to the YAML or JSON seed file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env first so RUST_LOG set there applies
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("screw_plus_storefront=info")),
        )
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
    let seed = cli.seed.as_deref();
    match cli.command {
        Commands::Search { query } => commands::browse::search(seed, &query).await?,
        Commands::Browse { category } => commands::browse::category(seed, &category).await?,
        Commands::Price {
            product_id,
            size,
            color,
        } => {
            commands::browse::price(seed, &product_id, size.as_deref(), color.as_deref()).await?;
        }
        Commands::Discount { mrp, sale } => commands::browse::discount(&mrp, &sale)?,
        Commands::Seed { file } => commands::seed::import(&file).await?,
    }
    Ok(())
}
