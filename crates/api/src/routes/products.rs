//! Product CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use document_store::DocumentStore;
use domain::{Product, ProductOut};

use super::{AppState, Message};
use crate::error::ApiError;
use crate::extract::ApiJson;

/// POST /products: create a product; responds with its new ID.
#[tracing::instrument(skip(state, product))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(product): ApiJson<Product>,
) -> Result<Json<Message>, ApiError> {
    let id = state.products.create_product(product).await?;
    Ok(Json(Message::new(id.to_string())))
}

/// GET /products: list products.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductOut>>, ApiError> {
    Ok(Json(state.products.list_products().await?))
}

/// GET /products/{id}: load one product.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductOut>, ApiError> {
    Ok(Json(state.products.get_product(&id).await?))
}

/// PUT /products/{id}: overwrite a product's fields.
#[tracing::instrument(skip(state, product))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(product): ApiJson<Product>,
) -> Result<Json<Message>, ApiError> {
    state.products.update_product(&id, product).await?;
    Ok(Json(Message::new("updated")))
}

/// DELETE /products/{id}: remove a product.
#[tracing::instrument(skip(state))]
pub async fn delete<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    state.products.delete_product(&id).await?;
    Ok(Json(Message::new("deleted")))
}
