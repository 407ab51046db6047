//! In-process document store.

use super::{Document, DocumentStore};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// Document store held entirely in memory
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<Collections>,
    mutations: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put`/`delete` calls so far
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Simulate an outage: while set, every call fails
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Read one record directly
    pub fn get(&self, collection: &str, key: &str) -> Option<Value> {
        self.collections
            .lock()
            .ok()?
            .get(collection)
            .and_then(|docs| docs.get(key).cloned())
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Remote {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Collections>> {
        self.collections
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(key, data)| Document {
                        key: key.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put(&self, collection: &str, key: &str, record: Value) -> StoreResult<()> {
        self.check_available()?;
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), record);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        self.check_available()?;
        if let Some(docs) = self.lock()?.get_mut(collection) {
            docs.remove(key);
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_overwrites_and_lists_by_key() {
        let store = MemoryDocumentStore::new();
        store.put("items", "b", json!({"v": 1})).await.unwrap();
        store.put("items", "a", json!({"v": 2})).await.unwrap();
        store.put("items", "b", json!({"v": 3})).await.unwrap();

        let docs = store.list_all("items").await.unwrap();
        let keys: Vec<_> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(docs[1].data, json!({"v": 3}));
        assert_eq!(store.mutation_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = MemoryDocumentStore::new();
        store.delete("items", "ghost").await.unwrap();
        assert!(store.list_all("items").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let store = MemoryDocumentStore::new();
        store.set_unavailable(true);
        assert!(store.list_all("items").await.is_err());
        assert!(store.put("items", "a", json!({})).await.is_err());
        assert!(store.delete("items", "a").await.is_err());
        assert_eq!(store.mutation_count(), 0);
    }
}
