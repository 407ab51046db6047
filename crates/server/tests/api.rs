//! End-to-end tests against a server bound to an ephemeral port.

use serde_json::{json, Value};
use std::sync::Arc;
use storefront_core::config::StorefrontConfig;
use storefront_core::state::{SqliteDocumentStore, StorefrontDb};
use storefront_core::store::{DocumentStore, HttpDocumentStore, MemoryDocumentStore};
use storefront_core::Storefront;
use storefront_server::{app, AppState};
use tokio::net::TcpListener;

struct TestServer {
    base_url: String,
    documents: Arc<dyn DocumentStore>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(documents: Arc<dyn DocumentStore>) -> Self {
        let mut storefront = Storefront::with_store(Arc::clone(&documents));
        storefront.load().await.unwrap();

        let state = AppState::new(
            Arc::clone(&documents),
            storefront,
            StorefrontConfig::default(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            documents,
            client: reqwest::Client::new(),
        }
    }

    async fn sqlite() -> Self {
        let db = StorefrontDb::open_in_memory().unwrap();
        Self::start(Arc::new(SqliteDocumentStore::new(&db))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        (res.status().as_u16(), res.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let res = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        (res.status().as_u16(), res.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn delete(&self, path: &str) -> Value {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_add_item_with_grouped_price() {
    let server = TestServer::sqlite().await;

    let (status, body) = server
        .post("/api/v1/catalog", json!({"name": "Widget", "price": "1,234.50"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["items"][0]["id"], "Widget");
    assert_eq!(body["items"][0]["price"], 1234.5);
    assert_eq!(body["items"][0]["price_label"], "$1,234.50");

    let docs = server.documents.list_all("items").await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].data, json!({"name": "Widget", "price": 1234.5}));
}

#[tokio::test]
async fn test_invalid_price_rejected_without_write() {
    let store = Arc::new(MemoryDocumentStore::new());
    let server = TestServer::start(store.clone()).await;

    let (status, body) = server
        .post("/api/v1/catalog", json!({"name": "Bad", "price": "abc"}))
        .await;
    assert_eq!(status, 422);
    assert_eq!(body["success"], false);
    assert_eq!(store.mutation_count(), 0);
}

#[tokio::test]
async fn test_dot_name_rejected_without_write() {
    let store = Arc::new(MemoryDocumentStore::new());
    let server = TestServer::start(store.clone()).await;

    let (status, body) = server
        .post("/api/v1/catalog", json!({"name": "..", "price": "5"}))
        .await;
    assert_eq!(status, 422);
    assert_eq!(body["success"], false);
    assert_eq!(store.mutation_count(), 0);
}

#[tokio::test]
async fn test_unrounded_price_label() {
    let server = TestServer::sqlite().await;
    let (_, body) = server
        .post("/api/v1/catalog", json!({"name": "Gizmo", "price": "1234.567"}))
        .await;
    assert_eq!(body["items"][0]["price"], 1234.567);
    assert_eq!(body["items"][0]["price_label"], "$1,234.567");
}

#[tokio::test]
async fn test_cart_flow() {
    let server = TestServer::sqlite().await;
    server
        .post("/api/v1/catalog", json!({"name": "Widget", "price": "5"}))
        .await;

    server.post("/api/v1/cart/items", json!({"id": "Widget"})).await;
    let (status, cart) = server
        .post("/api/v1/cart/items", json!({"id": "Widget"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["quantity"], 2);
    assert_eq!(cart["lines"][0]["label"], "$5.00 x 2");

    let (_, change) = server
        .post("/api/v1/cart/items/Widget/decrement", json!({}))
        .await;
    assert_eq!(change["outcome"], "updated");
    assert_eq!(change["quantity"], 1);

    // guarded at quantity 1
    let (_, change) = server
        .post("/api/v1/cart/items/Widget/decrement", json!({}))
        .await;
    assert_eq!(change["outcome"], "unchanged");

    // removing from the catalog leaves the cart alone
    let catalog = server.delete("/api/v1/catalog/Widget").await;
    assert!(catalog["items"].as_array().unwrap().is_empty());
    let cart = server.get("/api/v1/cart").await;
    assert_eq!(cart["lines"][0]["quantity"], 1);

    let cart = server.delete("/api/v1/cart/items/Widget").await;
    assert!(cart["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_unknown_item_to_cart() {
    let server = TestServer::sqlite().await;
    let (status, _) = server
        .post("/api/v1/cart/items", json!({"id": "Ghost"}))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_search_highlights_without_filtering() {
    let server = TestServer::sqlite().await;
    server
        .post("/api/v1/catalog", json!({"name": "Widget", "price": "1"}))
        .await;
    server
        .post("/api/v1/catalog", json!({"name": "Gadget", "price": "2"}))
        .await;

    let (_, catalog) = server.put("/api/v1/search", json!({"query": "wi"})).await;
    let items = catalog["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item["highlighted"], item["id"] == "Widget");
    }
}

#[tokio::test]
async fn test_draft_submit() {
    let server = TestServer::sqlite().await;

    let (_, draft) = server
        .put("/api/v1/draft", json!({"name": "Anvil", "price": "12,34"}))
        .await;
    assert_eq!(draft["price"], "1,234");

    let (status, catalog) = server.post("/api/v1/draft/submit", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(catalog["items"][0]["price"], 1234.0);

    let draft = server.get("/api/v1/draft").await;
    assert_eq!(draft, json!({"name": "", "price": ""}));
}

#[tokio::test]
async fn test_refresh_picks_up_external_writes() {
    let server = TestServer::sqlite().await;
    server
        .documents
        .put("items", "Gadget", json!({"name": "Gadget", "price": 3}))
        .await
        .unwrap();

    assert!(server.get("/api/v1/catalog").await["items"]
        .as_array()
        .unwrap()
        .is_empty());

    let (_, catalog) = server.post("/api/v1/catalog/refresh", json!({})).await;
    assert_eq!(catalog["items"][0]["id"], "Gadget");
}

#[tokio::test]
async fn test_http_store_against_document_api() {
    let server = TestServer::sqlite().await;
    let remote = Arc::new(HttpDocumentStore::new(server.base_url.clone()));

    // a second session using this server as its remote store
    let mut session = Storefront::with_store(remote.clone());
    session.load().await.unwrap();
    session.add_item("Blue Widget", "2,500").await.unwrap();

    let docs = server.documents.list_all("items").await.unwrap();
    assert_eq!(docs[0].key, "Blue Widget");
    assert_eq!(docs[0].data["price"], json!(2500.0));

    session.remove_item("Blue Widget").await.unwrap();
    assert!(session.catalog().items().is_empty());

    // deleting a missing key is a no-op success
    remote.delete("items", "Blue Widget").await.unwrap();
}

#[tokio::test]
async fn test_openapi_served() {
    let server = TestServer::sqlite().await;
    let spec = server.get("/api/v1/openapi.json").await;
    assert_eq!(spec["info"]["title"], "Storefront API");
    assert!(spec["paths"]["/api/v1/catalog"].is_object());
}
