use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Message API",
        "version": version,
        "endpoints": {
            "health": "GET /health",
            "list": "GET /messages",
            "show": "GET /messages/:messageId",
            "create": "POST /messages",
            "update": "PUT /messages/:messageId",
            "delete": "DELETE /messages/:messageId",
        }
    }))
}
