//! # Document API
//!
//! CRUD over keyed JSON records, the wire side of `HttpDocumentStore`.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_core::store::{Document, DocumentStore};
use utoipa::ToSchema;

use crate::{ApiResponse, ApiResult, AppState};

/// A record and its key
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentBody {
    pub key: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

impl From<Document> for DocumentBody {
    fn from(doc: Document) -> Self {
        Self {
            key: doc.key,
            data: doc.data,
        }
    }
}

pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/:collection/docs", get(list_documents))
        .route(
            "/:collection/docs/:key",
            axum::routing::put(put_document).delete(delete_document),
        )
}

/// List every document in a collection
#[utoipa::path(
    get,
    path = "/api/v1/collections/{collection}/docs",
    tag = "documents",
    params(("collection" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Documents ordered by key", body = Vec<DocumentBody>)
    )
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<Vec<DocumentBody>> {
    let docs = state.documents.list_all(&collection).await?;
    Ok(Json(docs.into_iter().map(DocumentBody::from).collect()))
}

/// Upsert a document; the request body is the whole record
#[utoipa::path(
    put,
    path = "/api/v1/collections/{collection}/docs/{key}",
    tag = "documents",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("key" = String, Path, description = "Document key")
    ),
    responses(
        (status = 200, description = "Document stored", body = ApiResponse)
    )
)]
pub async fn put_document(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
    Json(record): Json<Value>,
) -> ApiResult<ApiResponse> {
    state.documents.put(&collection, &key, record).await?;
    Ok(ApiResponse::ok(format!("Stored {}/{}", collection, key)))
}

/// Delete a document; deleting a missing key succeeds
#[utoipa::path(
    delete,
    path = "/api/v1/collections/{collection}/docs/{key}",
    tag = "documents",
    params(
        ("collection" = String, Path, description = "Collection name"),
        ("key" = String, Path, description = "Document key")
    ),
    responses(
        (status = 200, description = "Document deleted", body = ApiResponse)
    )
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Path((collection, key)): Path<(String, String)>,
) -> ApiResult<ApiResponse> {
    state.documents.delete(&collection, &key).await?;
    Ok(ApiResponse::ok(format!("Deleted {}/{}", collection, key)))
}
