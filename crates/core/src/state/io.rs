//! # IO Utilities
//!
//! File system operations for the `.storefront` runtime directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable overriding the runtime directory
pub const RUNTIME_PATH_ENV: &str = "STOREFRONT_RUNTIME_PATH";

/// Get the runtime directory path (.storefront)
///
/// Holds the SQLite database and the persisted configuration.
pub fn get_runtime_path() -> PathBuf {
    if let Ok(path) = std::env::var(RUNTIME_PATH_ENV) {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".storefront")
}

/// Read a file, returning `None` when it does not exist
pub async fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {:?}", path)),
    }
}

/// Write a file, creating parent directories as needed
pub async fn write_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_runtime_path() {
        if std::env::var(RUNTIME_PATH_ENV).is_err() {
            assert!(get_runtime_path().ends_with(".storefront"));
        }
    }

    #[tokio::test]
    async fn test_file_operations() {
        let dir = std::env::temp_dir().join(format!("storefront-io-{}", std::process::id()));
        let path = dir.join("nested").join("file.txt");

        assert_eq!(read_optional(&path).await.unwrap(), None);

        write_file(&path, "Hello, Storefront!").await.unwrap();
        assert_eq!(
            read_optional(&path).await.unwrap().as_deref(),
            Some("Hello, Storefront!")
        );

        let _ = fs::remove_dir_all(&dir).await;
    }
}
