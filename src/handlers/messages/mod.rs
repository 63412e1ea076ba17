// handlers/messages/mod.rs - Message resource handlers
//
// Mounted at /messages. Create, update and delete also maintain the
// owning user's `messages` list through the store.

use axum::{routing::get, Router};

use crate::state::AppState;

pub mod create;   // POST /messages
pub mod delete;   // DELETE /messages/:messageId
pub mod list;     // GET /messages
pub mod payload;
pub mod show;     // GET /messages/:messageId
pub mod update;   // PUT /messages/:messageId

pub use create::message_create;
pub use delete::message_delete;
pub use list::message_list;
pub use show::message_show;
pub use update::message_update;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(message_list).post(message_create))
        .route(
            "/:message_id",
            get(message_show).put(message_update).delete(message_delete),
        )
}
