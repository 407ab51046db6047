//! Document store reached over HTTP.
//!
//! Speaks the document API served by `storefront serve`:
//! `GET|PUT|DELETE {base}/api/v1/collections/{collection}/docs[/{key}]`.

use super::{Document, DocumentStore};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::Value;

/// Client for a remote Storefront document API
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/docs",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    fn document_url(&self, collection: &str, key: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(key)
        )
    }

    async fn check(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .send()
            .await?;
        let docs = Self::check(response).await?.json::<Vec<Document>>().await?;
        Ok(docs)
    }

    async fn put(&self, collection: &str, key: &str, record: Value) -> StoreResult<()> {
        let response = self
            .client
            .put(self.document_url(collection, key))
            .json(&record)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        let response = self
            .client
            .delete(self.document_url(collection, key))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_encode_keys() {
        let store = HttpDocumentStore::new("http://localhost:8080/");
        assert_eq!(store.base_url(), "http://localhost:8080");
        assert_eq!(
            store.document_url("items", "Blue Widget"),
            "http://localhost:8080/api/v1/collections/items/docs/Blue%20Widget"
        );
        assert_eq!(
            store.document_url("items", "a/b"),
            "http://localhost:8080/api/v1/collections/items/docs/a%2Fb"
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_is_http_error() {
        // reserve a free port, then release it so nothing is listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let store = HttpDocumentStore::new(format!("http://127.0.0.1:{}", port));
        let err = store.list_all("items").await.unwrap_err();
        assert!(matches!(err, StoreError::Http(_)));
    }
}
