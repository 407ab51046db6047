//! # Storefront Configuration
//!
//! Persisted at `.storefront/config.json`; environment variables win over
//! the file. Unset fields fall back to `ConfigDefaults`.

use crate::catalog::DEFAULT_COLLECTION;
use crate::state::{io, SqliteDocumentStore, StorefrontDb};
use crate::store::{DocumentStore, HttpDocumentStore, MemoryDocumentStore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ENV_STORE_URL: &str = "STOREFRONT_STORE_URL";
pub const ENV_DB_PATH: &str = "STOREFRONT_DB_PATH";
pub const ENV_COLLECTION: &str = "STOREFRONT_COLLECTION";
pub const ENV_PORT: &str = "STOREFRONT_PORT";

/// Special `db_path` value selecting the in-memory store
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Persisted configuration; every field optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorefrontConfig {
    /// Base URL of a remote document API. Takes precedence over `db_path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
    /// SQLite file for the local document store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// Collection holding catalog records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// HTTP port for `serve`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Values used when a field is unset
#[derive(Debug, Clone, Serialize)]
pub struct ConfigDefaults {
    pub collection: &'static str,
    pub port: u16,
    pub db_file: &'static str,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION,
            port: 8080,
            db_file: "storefront.db",
        }
    }
}

/// Resolved store selection
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Sqlite(PathBuf),
    Remote(String),
    Memory,
}

impl StorefrontConfig {
    /// Path of the persisted config file
    pub fn default_path() -> PathBuf {
        io::get_runtime_path().join("config.json")
    }

    /// Load from the default path, then apply environment overrides
    pub async fn load() -> Result<Self> {
        let mut config = Self::load_from(Self::default_path()).await?;
        config.merge(Self::from_env());
        Ok(config)
    }

    /// Load from `path`; a missing file yields the empty config
    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match io::read_optional(path).await? {
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file: {:?}", path)),
            None => Ok(Self::default()),
        }
    }

    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        io::write_file(path, &content).await
    }

    /// Merge `overrides` into the file at `path` and write it back.
    ///
    /// Environment overrides are never written; only what the file already
    /// held plus `overrides`.
    pub async fn persist_at(path: impl AsRef<Path>, overrides: StorefrontConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut saved = Self::load_from(path).await?;
        saved.merge(overrides);
        saved.save_to(path).await?;
        tracing::info!("Saved config to {:?}", path);
        Ok(saved)
    }

    /// Overrides taken from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            store_url: non_empty(ENV_STORE_URL),
            db_path: non_empty(ENV_DB_PATH).map(PathBuf::from),
            collection: non_empty(ENV_COLLECTION),
            port: non_empty(ENV_PORT).and_then(|p| match p.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!("Ignoring invalid {}={:?}", ENV_PORT, p);
                    None
                }
            }),
        }
    }

    /// Overlay every field that `other` sets
    pub fn merge(&mut self, other: StorefrontConfig) {
        if other.store_url.is_some() {
            self.store_url = other.store_url;
        }
        if other.db_path.is_some() {
            self.db_path = other.db_path;
        }
        if other.collection.is_some() {
            self.collection = other.collection;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
    }

    pub fn collection(&self) -> &str {
        self.collection
            .as_deref()
            .unwrap_or(ConfigDefaults::default().collection)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(ConfigDefaults::default().port)
    }

    pub fn backend(&self) -> StoreBackend {
        if let Some(url) = &self.store_url {
            return StoreBackend::Remote(url.clone());
        }
        match &self.db_path {
            Some(path) if path.as_os_str() == MEMORY_DB_PATH => StoreBackend::Memory,
            Some(path) => StoreBackend::Sqlite(path.clone()),
            None => StoreBackend::Sqlite(
                io::get_runtime_path().join(ConfigDefaults::default().db_file),
            ),
        }
    }

    /// Open the configured document store
    pub fn open_store(&self) -> Result<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match self.backend() {
            StoreBackend::Remote(url) => {
                tracing::info!("Using remote document store at {}", url);
                Arc::new(HttpDocumentStore::new(url))
            }
            StoreBackend::Sqlite(path) => {
                tracing::info!("Using SQLite document store at {:?}", path);
                let db = StorefrontDb::open_at(&path)
                    .with_context(|| format!("Failed to open document store at {:?}", path))?;
                Arc::new(SqliteDocumentStore::new(&db))
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory document store");
                Arc::new(MemoryDocumentStore::new())
            }
        };
        Ok(store)
    }
}
