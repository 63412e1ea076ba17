// handlers/messages/show.rs - GET /messages/:messageId handler

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::database::Message;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::payload::parse_message_id;

pub async fn message_show(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = parse_message_id(&message_id)?;

    state
        .store
        .find_message(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Message {} not found", id)))
}
