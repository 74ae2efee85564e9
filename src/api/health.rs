use axum::{extract::State, Json};
use serde::Serialize;
use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Ping the configured game store (Redis or in-memory)
    let store_status = if state.game.store_healthy().await {
        "connected".to_string()
    } else {
        "disconnected".to_string()
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_status,
    })
}
