// handlers/messages/create.rs - POST /messages handler
// Stores the message and puts it at the front of its author's message list

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::info;

use crate::database::Message;
use crate::error::ApiResult;
use crate::state::AppState;

use super::payload::CreateMessageRequest;

/**
 * POST /messages - Create a message owned by an existing user
 *
 * Expected Input:
 * ```json
 * {
 *   "title": "string",   // Required, non-blank
 *   "body": "string",    // Required, non-blank
 *   "author": "uuid"     // Required: id of an existing user
 * }
 * ```
 *
 * An unknown author is rejected with 422 and nothing is stored.
 */
pub async fn message_create(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let message = state.store.create_message(new).await?;
    info!("Created message {} by {}", message.id, message.author);

    Ok(Json(message))
}
