//! Session cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use document_store::DocumentStore;
use domain::{AddItemOutcome, Cart, CartItem};

use super::{AppState, Message};
use crate::error::ApiError;
use crate::extract::ApiJson;

/// POST /cart/{session_id}/items: add an item to the session's cart.
///
/// Responds with the new cart ID when the cart was created, otherwise
/// with `"added"`.
#[tracing::instrument(skip(state))]
pub async fn add_item<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(session_id): Path<String>,
    ApiJson(item): ApiJson<CartItem>,
) -> Result<Json<Message>, ApiError> {
    let message = match state.carts.add_item(&session_id, item).await? {
        AddItemOutcome::Created(id) => id.to_string(),
        AddItemOutcome::Added => "added".to_string(),
    };
    Ok(Json(Message::new(message)))
}

/// GET /cart/{session_id}: the session's cart, empty if none exists.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(session_id): Path<String>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.carts.get_cart(&session_id).await?))
}
