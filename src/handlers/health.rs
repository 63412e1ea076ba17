use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": backend,
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed for {} store: {}", backend, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": backend,
                    "error": "store unavailable",
                })),
            )
        }
    }
}
