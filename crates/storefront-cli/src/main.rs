mod storefront;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Storefront catalog and checkout command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the current catalog snapshot, most recently updated first
    Catalog {
        /// Only show products carrying this tag ("All" shows everything)
        #[arg(long)]
        tag: Option<String>,
        /// Print normalized products as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one product by handle
    Product {
        handle: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a cart for one variant and print the checkout URL
    Checkout {
        variant_id: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Check configuration and upstream connectivity
    Diag,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Catalog { tag, json } => {
            storefront::run_catalog(&config.upstream, tag.as_deref(), json).await?;
        }
        Commands::Product { handle, json } => {
            storefront::run_product(&config.upstream, &handle, json).await?;
        }
        Commands::Checkout {
            variant_id,
            quantity,
        } => {
            storefront::run_checkout(&config.upstream, &variant_id, quantity).await?;
        }
        Commands::Diag => storefront::run_diag(&config.upstream).await?,
    }

    Ok(())
}
