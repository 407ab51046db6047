//! # Cart Manager
//!
//! Session-local shopping cart. Entries hold a snapshot of the catalog item
//! taken when it was first added; later catalog changes never reach them.
//! There is at most one entry per item id, and no entry ever has a quantity
//! below one: the floor is enforced by removing the entry.

use crate::catalog::CatalogItem;
use crate::pricing;
use serde::{Deserialize, Serialize};

/// One line of the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: String,
    pub name: String,
    /// Unit price at the time of the first add
    pub price: f64,
    /// Always >= 1
    pub quantity: u32,
}

impl CartEntry {
    fn from_item(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
        }
    }

    /// Line label, e.g. `$1,234.50 x 2`. No total is computed.
    pub fn price_label(&self) -> String {
        format!("${} x {}", pricing::format_price(self.price), self.quantity)
    }
}

/// Outcome of a quantity change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Entry kept with this quantity
    Updated(u32),
    /// Quantity fell to zero or below and the entry was removed
    Removed,
    /// No entry with that id
    Missing,
    /// Guarded decrement refused to go below one
    Unchanged,
}

/// Ordered list of cart entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add one unit of `item`.
    ///
    /// An existing entry keeps its position and its original snapshot; only
    /// the quantity grows. Otherwise a new entry is appended.
    pub fn add(&mut self, item: &CatalogItem) -> &CartEntry {
        let index = match self.entries.iter().position(|entry| entry.id == item.id) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.quantity = entry.quantity.saturating_add(1);
                index
            }
            None => {
                self.entries.push(CartEntry::from_item(item));
                self.entries.len() - 1
            }
        };
        &self.entries[index]
    }

    /// Remove the entry for `id`; no-op if absent
    pub fn remove(&mut self, id: &str) -> Option<CartEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Apply `delta` to the quantity, removing the entry if it drops to zero
    /// or below
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> QuantityChange {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return QuantityChange::Missing;
        };

        let next = i64::from(self.entries[index].quantity).saturating_add(delta);
        if next <= 0 {
            self.entries.remove(index);
            return QuantityChange::Removed;
        }

        let quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.entries[index].quantity = quantity;
        QuantityChange::Updated(quantity)
    }

    pub fn increment(&mut self, id: &str) -> QuantityChange {
        self.change_quantity(id, 1)
    }

    /// Whether the decrement control is enabled for `id`
    pub fn can_decrement(&self, id: &str) -> bool {
        self.get(id).is_some_and(|entry| entry.quantity > 1)
    }

    /// Decrement guarded like the UI control: a no-op at quantity 1
    pub fn decrement(&mut self, id: &str) -> QuantityChange {
        if self.get(id).is_none() {
            return QuantityChange::Missing;
        }
        if !self.can_decrement(id) {
            return QuantityChange::Unchanged;
        }
        self.change_quantity(id, -1)
    }
}
