//! Storefront CLI
//!
//! `storefront serve` runs the HTTP service; the other subcommands manage the
//! catalog directly against the configured document store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use storefront_core::catalog::CatalogClient;
use storefront_core::config::StorefrontConfig;
use storefront_core::pricing;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Clone)]
#[command(author, version, about = "Storefront - catalog and cart service")]
struct Args {
    /// Remote document API to use instead of the local SQLite store
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Collection holding catalog items
    #[arg(long, global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the Storefront server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List catalog items
    Items,
    /// Add or overwrite a catalog item
    Add {
        /// Item name, also its id
        name: String,
        /// Price, grouping separators allowed (e.g. 1,234.50)
        price: String,
    },
    /// Remove a catalog item
    Remove {
        /// Item id
        id: String,
    },
    /// Save the given options (plus --store-url/--collection) to the config file
    Config {
        /// SQLite file for the local document store (`:memory:` for none)
        #[arg(long)]
        db_path: Option<PathBuf>,
        /// Port for `serve`
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Args {
    fn overrides(&self) -> StorefrontConfig {
        let (db_path, port) = match &self.command {
            Some(CliCommand::Serve { port }) => (None, *port),
            Some(CliCommand::Config { db_path, port }) => (db_path.clone(), *port),
            _ => (None, None),
        };
        StorefrontConfig {
            store_url: self.store_url.clone(),
            db_path,
            collection: self.collection.clone(),
            port,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn open_catalog(config: &StorefrontConfig) -> anyhow::Result<CatalogClient> {
    let mut catalog = CatalogClient::with_collection(config.open_store()?, config.collection());
    catalog.refresh().await.context("Failed to load catalog")?;
    Ok(catalog)
}

fn print_items(catalog: &CatalogClient) {
    if catalog.items().is_empty() {
        println!("No items in '{}'", catalog.collection());
        return;
    }
    for item in catalog.items() {
        println!(
            "{:<32} ${}",
            pricing::display_name(&item.name),
            pricing::format_price(item.price)
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let mut config = StorefrontConfig::load().await?;
    let overrides = args.overrides();
    config.merge(overrides.clone());

    match args.command {
        None | Some(CliCommand::Serve { .. }) => {
            println!("╔══════════════════════════════════════╗");
            println!("║          STOREFRONT SERVER           ║");
            println!("╚══════════════════════════════════════╝");
            storefront_server::run_server(config).await?;
        }
        Some(CliCommand::Items) => {
            let catalog = open_catalog(&config).await?;
            print_items(&catalog);
        }
        Some(CliCommand::Add { name, price }) => {
            let mut catalog = open_catalog(&config).await?;
            let item = catalog.add_item(&name, &price).await?;
            println!("✅ Stored '{}' at ${}", item.name, pricing::format_price(item.price));
            print_items(&catalog);
        }
        Some(CliCommand::Remove { id }) => {
            let mut catalog = open_catalog(&config).await?;
            catalog.remove_item(&id).await?;
            println!("🗑️  Removed '{}'", id);
            print_items(&catalog);
        }
        Some(CliCommand::Config { .. }) => {
            let path = StorefrontConfig::default_path();
            let saved = StorefrontConfig::persist_at(&path, overrides).await?;
            println!("💾 Saved {:?}", path);
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_command_overrides() {
        let args = Args::try_parse_from([
            "storefront",
            "config",
            "--port",
            "9000",
            "--db-path",
            ":memory:",
            "--store-url",
            "http://store:8080",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.port, Some(9000));
        assert_eq!(overrides.db_path, Some(PathBuf::from(":memory:")));
        assert_eq!(overrides.store_url.as_deref(), Some("http://store:8080"));
        assert_eq!(overrides.collection, None);
    }
}
