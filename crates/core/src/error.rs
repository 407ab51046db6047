//! Error types for Storefront Core
//!
//! - `StoreError`: document store backend failures
//! - `StorefrontError`: catalog/cart operation failures, including rejected input

/// Failure reported by a `DocumentStore` backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite backend failure
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Remote store unreachable or returned a transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote store answered with a non-success status
    #[error("remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// Stored document could not be (de)serialized
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Document did not match the expected record shape
    #[error("malformed record '{key}': {reason}")]
    MalformedRecord { key: String, reason: String },

    /// Blocking store task panicked or was cancelled
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Shared connection lock was poisoned
    #[error("lock error: {0}")]
    Lock(String),
}

/// Result alias for document store calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure of a storefront operation
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// Price text was not a non-negative finite number
    #[error("invalid price: '{0}'")]
    InvalidPrice(String),

    /// Item name was empty
    #[error("item name must not be empty")]
    EmptyName,

    /// Name cannot be used as a document key (`.` or `..` and the like)
    #[error("invalid item name: '{0}'")]
    InvalidName(String),

    /// Id is not present in the current catalog view
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Underlying store call failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl StorefrontError {
    /// True for errors caused by rejected user input
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPrice(_) | Self::EmptyName | Self::InvalidName(_)
        )
    }
}

/// Result alias for storefront operations
pub type Result<T> = std::result::Result<T, StorefrontError>;
