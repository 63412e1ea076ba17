// handlers/messages/update.rs - PUT /messages/:messageId handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::payload::{parse_message_id, UpdateMessageRequest};

/// PUT /messages/:messageId - overwrite the submitted fields and return the
/// stored result as `{ message }`. Changing `author` moves the message to the
/// new author's list.
pub async fn message_update(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = parse_message_id(&message_id)?;
    let Json(payload) = payload?;
    let changes = payload.validate()?;

    let message = state
        .store
        .update_message(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Message {} not found", id)))?;

    Ok(Json(json!({ "message": message })))
}
