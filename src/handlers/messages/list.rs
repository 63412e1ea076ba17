// handlers/messages/list.rs - GET /messages handler

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /messages - every stored message, in no particular order
pub async fn message_list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let messages = state.store.list_messages().await?;
    Ok(Json(json!({ "messages": messages })))
}
