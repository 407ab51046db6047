//! # Storefront API
//!
//! Session endpoints: catalog, search highlight, add-item draft and cart.
//! Catalog mutations answer with the refreshed catalog state.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use storefront_core::cart::QuantityChange;
use storefront_core::config::{ConfigDefaults, StorefrontConfig};
use storefront_core::session::{CartLineView, CatalogEntryView, Storefront};
use utoipa::ToSchema;

use crate::{ApiResponse, ApiResult, AppState};

// === API Types ===

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogItemResponse {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub price: f64,
    pub price_label: String,
    pub highlighted: bool,
}

impl From<CatalogEntryView> for CatalogItemResponse {
    fn from(view: CatalogEntryView) -> Self {
        Self {
            id: view.id,
            name: view.name,
            display_name: view.display_name,
            price: view.price,
            price_label: view.price_label,
            highlighted: view.highlighted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogResponse {
    pub query: String,
    pub items: Vec<CatalogItemResponse>,
}

impl CatalogResponse {
    fn from_session(storefront: &Storefront) -> Self {
        Self {
            query: storefront.search_query().to_string(),
            items: storefront
                .catalog_view()
                .into_iter()
                .map(CatalogItemResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub name: String,
    /// Price text; grouping separators allowed
    pub price: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftResponse {
    pub name: String,
    pub price: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDraftRequest {
    pub name: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartLineResponse {
    pub id: String,
    pub display_name: String,
    pub price: f64,
    pub quantity: u32,
    pub label: String,
    pub can_decrement: bool,
}

impl From<CartLineView> for CartLineResponse {
    fn from(view: CartLineView) -> Self {
        Self {
            id: view.id,
            display_name: view.display_name,
            price: view.price,
            quantity: view.quantity,
            label: view.label,
            can_decrement: view.can_decrement,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
}

impl CartResponse {
    fn from_session(storefront: &Storefront) -> Self {
        Self {
            lines: storefront
                .cart_view()
                .into_iter()
                .map(CartLineResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuantityResponse {
    pub id: String,
    /// `updated`, `removed`, `missing` or `unchanged`
    pub outcome: String,
    pub quantity: Option<u32>,
}

impl QuantityResponse {
    fn new(id: String, change: QuantityChange) -> Self {
        let (outcome, quantity) = match change {
            QuantityChange::Updated(q) => ("updated", Some(q)),
            QuantityChange::Removed => ("removed", None),
            QuantityChange::Missing => ("missing", None),
            QuantityChange::Unchanged => ("unchanged", None),
        };
        Self {
            id,
            outcome: outcome.to_string(),
            quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    #[schema(value_type = Object)]
    pub config: StorefrontConfig,
    #[schema(value_type = Object)]
    pub defaults: ConfigDefaults,
}

pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/catalog", get(get_catalog).post(add_item))
        .route("/api/v1/catalog/refresh", post(refresh_catalog))
        .route("/api/v1/catalog/:id", delete(remove_item))
        .route("/api/v1/search", put(set_search))
        .route("/api/v1/draft", get(get_draft).put(update_draft))
        .route("/api/v1/draft/submit", post(submit_draft))
        .route("/api/v1/cart", get(get_cart))
        .route("/api/v1/cart/items", post(add_to_cart))
        .route("/api/v1/cart/items/:id", delete(remove_from_cart))
        .route("/api/v1/cart/items/:id/increment", post(increment_quantity))
        .route("/api/v1/cart/items/:id/decrement", post(decrement_quantity))
        .route("/api/v1/config", get(get_config))
}

// === Catalog Handlers ===

/// Current catalog with search highlights
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog as of the last refresh", body = CatalogResponse)
    )
)]
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let storefront = state.storefront.lock().await;
    Json(CatalogResponse::from_session(&storefront))
}

/// Add or overwrite a catalog item
#[utoipa::path(
    post,
    path = "/api/v1/catalog",
    tag = "catalog",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item stored, catalog refreshed", body = CatalogResponse),
        (status = 422, description = "Invalid name or price", body = ApiResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> ApiResult<CatalogResponse> {
    let mut storefront = state.storefront.lock().await;
    storefront.add_item(&req.name, &req.price).await?;
    Ok(Json(CatalogResponse::from_session(&storefront)))
}

/// Remove a catalog item; cart entries are kept
#[utoipa::path(
    delete,
    path = "/api/v1/catalog/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item removed, catalog refreshed", body = CatalogResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CatalogResponse> {
    let mut storefront = state.storefront.lock().await;
    storefront.remove_item(&id).await?;
    Ok(Json(CatalogResponse::from_session(&storefront)))
}

/// Re-read the whole catalog from the store
#[utoipa::path(
    post,
    path = "/api/v1/catalog/refresh",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog refreshed", body = CatalogResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn refresh_catalog(State(state): State<AppState>) -> ApiResult<CatalogResponse> {
    let mut storefront = state.storefront.lock().await;
    storefront.refresh().await?;
    Ok(Json(CatalogResponse::from_session(&storefront)))
}

/// Set the search query used for highlighting
#[utoipa::path(
    put,
    path = "/api/v1/search",
    tag = "catalog",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Catalog with updated highlights", body = CatalogResponse)
    )
)]
pub async fn set_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Json<CatalogResponse> {
    let mut storefront = state.storefront.lock().await;
    storefront.set_search_query(req.query);
    Json(CatalogResponse::from_session(&storefront))
}

// === Draft Handlers ===

/// Current add-item draft
#[utoipa::path(
    get,
    path = "/api/v1/draft",
    tag = "draft",
    responses(
        (status = 200, description = "Draft form state", body = DraftResponse)
    )
)]
pub async fn get_draft(State(state): State<AppState>) -> Json<DraftResponse> {
    let storefront = state.storefront.lock().await;
    let draft = storefront.draft();
    Json(DraftResponse {
        name: draft.name.clone(),
        price: draft.price.clone(),
    })
}

/// Update draft fields; price text is re-grouped as typed
#[utoipa::path(
    put,
    path = "/api/v1/draft",
    tag = "draft",
    request_body = UpdateDraftRequest,
    responses(
        (status = 200, description = "Updated draft", body = DraftResponse)
    )
)]
pub async fn update_draft(
    State(state): State<AppState>,
    Json(req): Json<UpdateDraftRequest>,
) -> Json<DraftResponse> {
    let mut storefront = state.storefront.lock().await;
    let draft = storefront.draft_mut();
    if let Some(name) = req.name {
        draft.set_name(name);
    }
    if let Some(price) = req.price {
        draft.set_price_input(&price);
    }
    Json(DraftResponse {
        name: draft.name.clone(),
        price: draft.price.clone(),
    })
}

/// Submit the draft as a new catalog item
#[utoipa::path(
    post,
    path = "/api/v1/draft/submit",
    tag = "draft",
    responses(
        (status = 200, description = "Item stored, draft cleared", body = CatalogResponse),
        (status = 422, description = "Invalid name or price; draft kept", body = ApiResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn submit_draft(State(state): State<AppState>) -> ApiResult<CatalogResponse> {
    let mut storefront = state.storefront.lock().await;
    storefront.submit_draft().await?;
    Ok(Json(CatalogResponse::from_session(&storefront)))
}

// === Cart Handlers ===

/// Cart lines in insertion order
#[utoipa::path(
    get,
    path = "/api/v1/cart",
    tag = "cart",
    responses(
        (status = 200, description = "Cart contents", body = CartResponse)
    )
)]
pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    let storefront = state.storefront.lock().await;
    Json(CartResponse::from_session(&storefront))
}

/// Add one unit of a catalog item
#[utoipa::path(
    post,
    path = "/api/v1/cart/items",
    tag = "cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Item not in the catalog", body = ApiResponse)
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(req): Json<AddToCartRequest>,
) -> ApiResult<CartResponse> {
    let mut storefront = state.storefront.lock().await;
    storefront.add_to_cart(&req.id)?;
    Ok(Json(CartResponse::from_session(&storefront)))
}

/// Remove a cart line; missing ids are ignored
#[utoipa::path(
    delete,
    path = "/api/v1/cart/items/{id}",
    tag = "cart",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse)
    )
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CartResponse> {
    let mut storefront = state.storefront.lock().await;
    storefront.remove_from_cart(&id);
    Json(CartResponse::from_session(&storefront))
}

/// Increase a line's quantity by one
#[utoipa::path(
    post,
    path = "/api/v1/cart/items/{id}/increment",
    tag = "cart",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Quantity change outcome", body = QuantityResponse)
    )
)]
pub async fn increment_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<QuantityResponse> {
    let change = state.storefront.lock().await.increment(&id);
    Json(QuantityResponse::new(id, change))
}

/// Decrease a line's quantity by one; refused at quantity 1
#[utoipa::path(
    post,
    path = "/api/v1/cart/items/{id}/decrement",
    tag = "cart",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Quantity change outcome", body = QuantityResponse)
    )
)]
pub async fn decrement_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<QuantityResponse> {
    let change = state.storefront.lock().await.decrement(&id);
    Json(QuantityResponse::new(id, change))
}

// === Config Handler ===

/// Effective configuration
#[utoipa::path(
    get,
    path = "/api/v1/config",
    tag = "config",
    responses(
        (status = 200, description = "Configuration and defaults", body = ConfigResponse)
    )
)]
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        config: (*state.config).clone(),
        defaults: ConfigDefaults::default(),
    })
}
