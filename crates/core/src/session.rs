//! # Storefront Session
//!
//! One controller per session owning the catalog client, the cart, the
//! search query and the pending add-item draft. Built once and passed by
//! reference to whatever renders it.

use crate::cart::{Cart, CartEntry, QuantityChange};
use crate::catalog::{CatalogClient, CatalogItem};
use crate::error::{Result, StorefrontError};
use crate::pricing;
use crate::search;
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pending add-item form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    /// Price text as displayed, separators included
    pub price: String,
}

impl ItemDraft {
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Store typed price text with grouping re-applied
    pub fn set_price_input(&mut self, input: &str) {
        self.price = pricing::regroup_input(input);
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.price.clear();
    }
}

/// Catalog item prepared for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntryView {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub price: f64,
    pub price_label: String,
    pub highlighted: bool,
}

/// Cart line prepared for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    pub id: String,
    pub display_name: String,
    pub price: f64,
    pub quantity: u32,
    pub label: String,
    pub can_decrement: bool,
}

/// Session controller
pub struct Storefront {
    catalog: CatalogClient,
    cart: Cart,
    search_query: String,
    draft: ItemDraft,
}

impl Storefront {
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            search_query: String::new(),
            draft: ItemDraft::default(),
        }
    }

    /// Controller over `store` using the default collection
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(CatalogClient::new(store))
    }

    /// Initial load
    pub async fn load(&mut self) -> Result<()> {
        self.catalog.refresh().await?;
        Ok(())
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn draft(&self) -> &ItemDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ItemDraft {
        &mut self.draft
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn is_highlighted(&self, item: &CatalogItem) -> bool {
        search::is_match(&self.search_query, &item.name)
    }

    // =========================================================================
    // Catalog actions
    // =========================================================================

    pub async fn refresh(&mut self) -> Result<()> {
        self.catalog.refresh().await?;
        Ok(())
    }

    pub async fn add_item(&mut self, name: &str, price_text: &str) -> Result<CatalogItem> {
        self.catalog.add_item(name, price_text).await
    }

    /// Submit the draft; it is cleared only when the item was stored
    pub async fn submit_draft(&mut self) -> Result<CatalogItem> {
        let ItemDraft { name, price } = self.draft.clone();
        let item = self.catalog.add_item(&name, &price).await?;
        self.draft.clear();
        Ok(item)
    }

    /// Remove from the catalog. Cart entries for `id` are left alone.
    pub async fn remove_item(&mut self, id: &str) -> Result<()> {
        self.catalog.remove_item(id).await
    }

    // =========================================================================
    // Cart actions
    // =========================================================================

    /// Add the catalog item `id` to the cart
    pub fn add_to_cart(&mut self, id: &str) -> Result<&CartEntry> {
        let item = self
            .catalog
            .get(id)
            .ok_or_else(|| StorefrontError::ItemNotFound(id.to_string()))?;
        Ok(self.cart.add(item))
    }

    pub fn remove_from_cart(&mut self, id: &str) -> Option<CartEntry> {
        self.cart.remove(id)
    }

    pub fn change_quantity(&mut self, id: &str, delta: i64) -> QuantityChange {
        self.cart.change_quantity(id, delta)
    }

    pub fn increment(&mut self, id: &str) -> QuantityChange {
        self.cart.increment(id)
    }

    pub fn decrement(&mut self, id: &str) -> QuantityChange {
        self.cart.decrement(id)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Every catalog item, matches flagged rather than filtered
    pub fn catalog_view(&self) -> Vec<CatalogEntryView> {
        self.catalog
            .items()
            .iter()
            .map(|item| CatalogEntryView {
                id: item.id.clone(),
                name: item.name.clone(),
                display_name: pricing::display_name(&item.name),
                price: item.price,
                price_label: format!("${}", pricing::format_price(item.price)),
                highlighted: self.is_highlighted(item),
            })
            .collect()
    }

    pub fn cart_view(&self) -> Vec<CartLineView> {
        self.cart
            .entries()
            .iter()
            .map(|entry| CartLineView {
                id: entry.id.clone(),
                display_name: pricing::display_name(&entry.name),
                price: entry.price,
                quantity: entry.quantity,
                label: entry.price_label(),
                can_decrement: entry.quantity > 1,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;

    async fn storefront() -> (Arc<MemoryDocumentStore>, Storefront) {
        let store = Arc::new(MemoryDocumentStore::new());
        let mut storefront = Storefront::with_store(store.clone());
        storefront.load().await.unwrap();
        (store, storefront)
    }

    #[tokio::test]
    async fn test_removing_catalog_item_keeps_cart_entry() {
        let (_store, mut sf) = storefront().await;
        sf.add_item("Widget", "5").await.unwrap();
        sf.add_to_cart("Widget").unwrap();
        sf.add_to_cart("Widget").unwrap();

        sf.remove_item("Widget").await.unwrap();

        assert!(sf.catalog().items().is_empty());
        let entry = sf.cart().get("Widget").unwrap();
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.price, 5.0);
    }

    #[tokio::test]
    async fn test_reprice_does_not_reach_cart() {
        let (_store, mut sf) = storefront().await;
        sf.add_item("Widget", "5").await.unwrap();
        sf.add_to_cart("Widget").unwrap();

        sf.add_item("Widget", "8").await.unwrap();
        sf.add_to_cart("Widget").unwrap();

        let entry = sf.cart().get("Widget").unwrap();
        assert_eq!(entry.price, 5.0);
        assert_eq!(entry.quantity, 2);
    }

    #[tokio::test]
    async fn test_add_to_cart_unknown_id() {
        let (_store, mut sf) = storefront().await;
        let err = sf.add_to_cart("Ghost").unwrap_err();
        assert!(matches!(err, StorefrontError::ItemNotFound(_)));
        assert!(sf.cart().is_empty());
    }

    #[tokio::test]
    async fn test_draft_cleared_only_on_success() {
        let (store, mut sf) = storefront().await;

        sf.draft_mut().set_name("Bad");
        sf.draft_mut().set_price_input("abc");
        assert!(sf.submit_draft().await.is_err());
        assert_eq!(sf.draft().name, "Bad");
        assert_eq!(store.mutation_count(), 0);

        sf.draft_mut().set_name("Widget");
        sf.draft_mut().set_price_input("1234.50");
        assert_eq!(sf.draft().price, "1,234.50");

        let item = sf.submit_draft().await.unwrap();
        assert_eq!(item.price, 1234.5);
        assert_eq!(sf.draft(), &ItemDraft::default());
    }

    #[tokio::test]
    async fn test_catalog_view_highlights_without_filtering() {
        let (_store, mut sf) = storefront().await;
        sf.add_item("widget", "1234.5").await.unwrap();
        sf.add_item("Gadget", "2").await.unwrap();

        sf.set_search_query("WI");
        let view = sf.catalog_view();
        assert_eq!(view.len(), 2);

        let gadget = view.iter().find(|v| v.id == "Gadget").unwrap();
        let widget = view.iter().find(|v| v.id == "widget").unwrap();
        assert!(!gadget.highlighted);
        assert!(widget.highlighted);
        assert_eq!(widget.display_name, "Widget");
        assert_eq!(widget.price_label, "$1,234.50");

        sf.set_search_query("");
        assert!(sf.catalog_view().iter().all(|v| !v.highlighted));
    }

    #[tokio::test]
    async fn test_price_labels_parse_back_to_stored_price() {
        let (_store, mut sf) = storefront().await;
        sf.add_item("Gizmo", "1234.567").await.unwrap();
        sf.add_to_cart("Gizmo").unwrap();

        let view = sf.catalog_view();
        assert_eq!(view[0].price_label, "$1,234.567");
        let shown = view[0].price_label.trim_start_matches('$');
        assert_eq!(pricing::parse_price(shown).unwrap(), sf.catalog().items()[0].price);

        assert_eq!(sf.cart_view()[0].label, "$1,234.567 x 1");
    }

    #[tokio::test]
    async fn test_cart_view_guards_decrement() {
        let (_store, mut sf) = storefront().await;
        sf.add_item("Widget", "5").await.unwrap();
        sf.add_to_cart("Widget").unwrap();

        let line = &sf.cart_view()[0];
        assert!(!line.can_decrement);
        assert_eq!(line.label, "$5.00 x 1");

        assert_eq!(sf.decrement("Widget"), QuantityChange::Unchanged);
        assert_eq!(sf.increment("Widget"), QuantityChange::Updated(2));
        assert!(sf.cart_view()[0].can_decrement);

        assert_eq!(sf.change_quantity("Widget", -2), QuantityChange::Removed);
        assert!(sf.cart_view().is_empty());
    }
}
