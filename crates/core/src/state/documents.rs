//! # Document Storage
//!
//! SQLite-backed `DocumentStore`. Each record is a row in the `documents`
//! table, keyed by `(collection, key)`, with its body stored as JSON text.
//! The async trait methods run the rusqlite calls on tokio's blocking pool.

use super::db::StorefrontDb;
use crate::error::{StoreError, StoreResult};
use crate::store::{Document, DocumentStore};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

/// Document store over the shared `StorefrontDb` connection
#[derive(Clone)]
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<rusqlite::Connection>>,
}

impl SqliteDocumentStore {
    /// Create a new store from a StorefrontDb
    pub fn new(db: &StorefrontDb) -> Self {
        Self {
            conn: db.connection(),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, rusqlite::Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&SqliteDocumentStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store)).await?
    }

    /// List every document in a collection
    pub fn list_documents(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT key, data
            FROM documents
            WHERE collection = ?1
            ORDER BY key
            "#,
        )?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, data)| {
                let data = serde_json::from_str(&data).map_err(|e| StoreError::MalformedRecord {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Document { key, data })
            })
            .collect()
    }

    /// Insert or replace a document
    pub fn put_document(&self, collection: &str, key: &str, record: &Value) -> StoreResult<()> {
        let data = serde_json::to_string(record)?;
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO documents (collection, key, data, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(collection, key) DO UPDATE SET
                data = ?3,
                updated_at = ?4
            "#,
            params![collection, key, data, Utc::now().to_rfc3339()],
        )?;

        tracing::debug!("Stored document {}/{}", collection, key);
        Ok(())
    }

    /// Delete a document; returns whether a row existed
    pub fn delete_document(&self, collection: &str, key: &str) -> StoreResult<bool> {
        let conn = self.lock()?;
        let affected = conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND key = ?2",
            params![collection, key],
        )?;
        Ok(affected > 0)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let collection = collection.to_string();
        self.blocking(move |store| store.list_documents(&collection))
            .await
    }

    async fn put(&self, collection: &str, key: &str, record: Value) -> StoreResult<()> {
        let (collection, key) = (collection.to_string(), key.to_string());
        self.blocking(move |store| store.put_document(&collection, &key, &record))
            .await
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        let (collection, key) = (collection.to_string(), key.to_string());
        self.blocking(move |store| store.delete_document(&collection, &key).map(|_| ()))
            .await
    }
}
