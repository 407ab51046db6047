//! # Document Store
//!
//! The remote persistence collaborator, reduced to three calls:
//! list a collection, upsert a record by key, delete a record by key.
//!
//! ## Backends
//!
//! - `SqliteDocumentStore` (in `state::documents`) - local SQLite file
//! - `HttpDocumentStore` - another Storefront server's document API
//! - `MemoryDocumentStore` - process-local, for tests and throwaway sessions

pub mod http;
pub mod memory;

pub use http::HttpDocumentStore;
pub use memory::MemoryDocumentStore;

use crate::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A keyed record inside a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Record key, unique within its collection
    pub key: String,
    /// Record body
    pub data: Value,
}

/// CRUD surface of a document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every record in `collection`, ordered by key
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Upsert: fully replace the record at `key`
    async fn put(&self, collection: &str, key: &str, record: Value) -> StoreResult<()>;

    /// Delete the record at `key`; a missing key is not an error
    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()>;
}
