//! # Catalog Store Client
//!
//! Holds the in-memory catalog as a read-through cache of the `items`
//! collection. Every successful mutation is followed by a full refresh, so
//! the cached list is always exactly the store's contents as of the last
//! read. Nothing is patched locally.

use crate::error::{Result, StoreError, StorefrontError};
use crate::pricing;
use crate::store::{Document, DocumentStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default collection holding catalog records
pub const DEFAULT_COLLECTION: &str = "items";

/// Record shape persisted in the store, keyed by `name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub price: f64,
}

/// A sellable item as seen by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Store key; equal to the name the item was created with
    pub id: String,
    /// Display label
    pub name: String,
    /// Unit price
    pub price: f64,
}

impl CatalogItem {
    fn from_document(doc: Document) -> std::result::Result<Self, StoreError> {
        let record: ItemRecord =
            serde_json::from_value(doc.data).map_err(|e| StoreError::MalformedRecord {
                key: doc.key.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            id: doc.key,
            name: record.name,
            price: record.price,
        })
    }
}

/// Catalog client over any `DocumentStore`
pub struct CatalogClient {
    store: Arc<dyn DocumentStore>,
    collection: String,
    items: Vec<CatalogItem>,
}

impl CatalogClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_collection(store, DEFAULT_COLLECTION)
    }

    pub fn with_collection(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            items: Vec::new(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Items as of the last successful refresh
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Replace the cached list with the store's full contents.
    ///
    /// On failure the previous list is kept untouched.
    pub async fn refresh(&mut self) -> Result<&[CatalogItem]> {
        let docs = self.store.list_all(&self.collection).await?;
        let items = docs
            .into_iter()
            .map(CatalogItem::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!("Refreshed {} catalog items", items.len());
        self.items = items;
        Ok(&self.items)
    }

    /// Create or overwrite the item keyed by `name`, then refresh.
    ///
    /// Rejected input (empty name, unparseable price) never reaches the store.
    pub async fn add_item(&mut self, name: &str, price_text: &str) -> Result<CatalogItem> {
        if name.is_empty() {
            tracing::warn!("Rejected catalog item with empty name");
            return Err(StorefrontError::EmptyName);
        }
        // dot segments are rewritten by URL normalization
        if name.chars().all(|c| c == '.') {
            tracing::warn!("Rejected catalog item name {:?}", name);
            return Err(StorefrontError::InvalidName(name.to_string()));
        }
        let price = pricing::parse_price(price_text).map_err(|e| {
            tracing::warn!("Rejected price {:?} for '{}'", price_text, name);
            e
        })?;

        let record = ItemRecord {
            name: name.to_string(),
            price,
        };
        self.store
            .put(&self.collection, name, serde_json::to_value(&record).map_err(StoreError::from)?)
            .await?;
        tracing::info!("Stored catalog item '{}' at {}", name, price);

        self.refresh().await?;

        Ok(CatalogItem {
            id: name.to_string(),
            name: record.name,
            price: record.price,
        })
    }

    /// Delete the item keyed by `id`, then refresh
    pub async fn remove_item(&mut self, id: &str) -> Result<()> {
        self.store.delete(&self.collection, id).await?;
        tracing::info!("Removed catalog item '{}'", id);

        self.refresh().await?;
        Ok(())
    }
}
