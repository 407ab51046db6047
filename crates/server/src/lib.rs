//! Storefront Server
//!
//! Axum service exposing two surfaces:
//! - the document API, so other sessions can use this process as their store
//! - the session API, driving one `Storefront` controller

pub mod api;

use axum::{
    body::Body,
    http::{header, Response, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use storefront_core::config::StorefrontConfig;
use storefront_core::error::{StoreError, StorefrontError};
use storefront_core::session::Storefront;
use storefront_core::store::DocumentStore;
use tokio::{net::TcpListener, sync::Mutex};
use utoipa::{OpenApi, ToSchema};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Store served by the document API
    pub documents: Arc<dyn DocumentStore>,
    /// The session controller; actions are applied one at a time
    pub storefront: Arc<Mutex<Storefront>>,
    pub config: Arc<StorefrontConfig>,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        storefront: Storefront,
        config: StorefrontConfig,
    ) -> Self {
        Self {
            documents,
            storefront: Arc::new(Mutex::new(storefront)),
            config: Arc::new(config),
        }
    }
}

// === API Types ===

#[derive(Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

/// Error returned by handlers, rendered as an `ApiResponse` body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<StorefrontError> for ApiError {
    fn from(err: StorefrontError) -> Self {
        let status = match &err {
            e if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            StorefrontError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_GATEWAY,
        };
        tracing::warn!("Request failed ({}): {}", status, err);
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Document store failure: {}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ApiResponse {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = "Catalog, cart and document store API for the Storefront"
    ),
    paths(
        api::documents::list_documents,
        api::documents::put_document,
        api::documents::delete_document,
        api::storefront::get_catalog,
        api::storefront::add_item,
        api::storefront::remove_item,
        api::storefront::refresh_catalog,
        api::storefront::set_search,
        api::storefront::get_draft,
        api::storefront::update_draft,
        api::storefront::submit_draft,
        api::storefront::get_cart,
        api::storefront::add_to_cart,
        api::storefront::remove_from_cart,
        api::storefront::increment_quantity,
        api::storefront::decrement_quantity,
        api::storefront::get_config
    ),
    components(
        schemas(
            ApiResponse,
            api::documents::DocumentBody,
            api::storefront::CatalogResponse,
            api::storefront::CatalogItemResponse,
            api::storefront::AddItemRequest,
            api::storefront::SearchRequest,
            api::storefront::DraftResponse,
            api::storefront::UpdateDraftRequest,
            api::storefront::CartResponse,
            api::storefront::CartLineResponse,
            api::storefront::AddToCartRequest,
            api::storefront::QuantityResponse,
            api::storefront::ConfigResponse
        )
    ),
    tags(
        (name = "documents", description = "Document store"),
        (name = "catalog", description = "Catalog items and search"),
        (name = "draft", description = "Pending add-item form"),
        (name = "cart", description = "Session cart"),
        (name = "config", description = "Configuration")
    )
)]
pub struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    match ApiDoc::openapi().to_json() {
        Ok(spec) => Response::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(spec))
            .unwrap_or_default(),
        Err(e) => ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
        .into_response(),
    }
}

/// Build the full router over `state`
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/collections", api::documents::document_routes())
        .merge(api::storefront::storefront_routes())
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state)
}

// === Server Entry ===

/// Open stores per `config`, load the catalog and serve until shutdown
pub async fn run_server(config: StorefrontConfig) -> anyhow::Result<()> {
    // The document API always serves the local store
    let mut local = config.clone();
    local.store_url = None;
    let documents = local.open_store()?;

    let session_store = if config.store_url.is_some() {
        config.open_store()?
    } else {
        Arc::clone(&documents)
    };

    let mut storefront = Storefront::new(
        storefront_core::catalog::CatalogClient::with_collection(
            session_store,
            config.collection(),
        ),
    );
    if let Err(e) = storefront.load().await {
        // Stay up with an empty catalog; the next refresh may succeed
        tracing::warn!("Initial catalog load failed: {}", e);
    }

    let port = config.port();
    let app = app(AppState::new(documents, storefront, config));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("🛒 Storefront Server running at http://{}", addr);
    println!("   API v1 Routes:");
    println!("   Documents: /api/v1/collections/:collection/docs");
    println!("   Catalog:   /api/v1/catalog, /refresh, /api/v1/search");
    println!("   Draft:     /api/v1/draft, /submit");
    println!("   Cart:      /api/v1/cart, /items");
    println!("   Config:    /api/v1/config");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
