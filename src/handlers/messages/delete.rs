// handlers/messages/delete.rs - DELETE /messages/:messageId handler

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::payload::parse_message_id;

pub const DELETED_CONFIRMATION: &str = "Successfully deleted.";

/// DELETE /messages/:messageId - remove the message and pull it from its author's list
pub async fn message_delete(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_message_id(&message_id)?;

    let message = state
        .store
        .delete_message(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Message {} not found", id)))?;
    info!("Deleted message {} by {}", message.id, message.author);

    Ok(Json(json!({ "message": DELETED_CONFIRMATION })))
}
