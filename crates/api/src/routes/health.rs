//! Liveness endpoints.

use axum::Json;
use serde::Serialize;

use super::Message;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /: confirms the API is running.
pub async fn root() -> Json<Message> {
    Json(Message::new("E-commerce API running"))
}

/// GET /health: returns system health status.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
