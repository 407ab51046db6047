//! # Storefront Core
//!
//! Catalog and cart state management for the Storefront, plus the document
//! store backends the catalog is read from.
//!
//! ## Architecture
//!
//! - `catalog` - Catalog Store Client (full refresh after every mutation)
//! - `cart` - session-local cart with merge-by-id and a quantity floor of one
//! - `session` - `Storefront`, the per-session controller owning both
//! - `pricing` / `search` - price text grouping and prefix highlighting
//! - `store` - the `DocumentStore` contract, HTTP and in-memory backends
//! - `state` - SQLite database and the SQLite document store
//! - `config` - persisted configuration and store selection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_core::config::StorefrontConfig;
//! use storefront_core::session::Storefront;
//!
//! let config = StorefrontConfig::load().await?;
//! let mut storefront = Storefront::with_store(config.open_store()?);
//! storefront.load().await?;
//! storefront.add_item("Widget", "1,234.50").await?;
//! storefront.add_to_cart("Widget")?;
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pricing;
pub mod search;
pub mod session;
pub mod state;
pub mod store;

pub use cart::{Cart, CartEntry, QuantityChange};
pub use catalog::{CatalogClient, CatalogItem, ItemRecord};
pub use error::{StoreError, StorefrontError};
pub use session::{ItemDraft, Storefront};
pub use store::{Document, DocumentStore};
