//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use document_store::DocumentStore;
use domain::{Order, OrderOut};

use super::{AppState, Message};
use crate::error::ApiError;
use crate::extract::ApiJson;

/// POST /orders: place an order; responds with its new ID.
#[tracing::instrument(skip(state, order))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(order): ApiJson<Order>,
) -> Result<Json<Message>, ApiError> {
    let id = state.orders.create_order(order).await?;
    Ok(Json(Message::new(id.to_string())))
}

/// GET /orders: list orders.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderOut>>, ApiError> {
    Ok(Json(state.orders.list_orders().await?))
}
