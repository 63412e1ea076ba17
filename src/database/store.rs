use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Message, MessageChanges, NewMessage, NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Author not found: {0}")]
    AuthorNotFound(Uuid),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Sqlx(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for messages and the users that author them.
///
/// Implementations keep each user's `messages` list in step with the
/// `author` of every stored message:
///
/// - `create_message` fails with [`StoreError::AuthorNotFound`] and stores
///   nothing when the author does not exist, otherwise it stores the message
///   and puts its id at the front of the author's list.
/// - `update_message` moves the id between lists when the author changes.
/// - `delete_message` removes the message and pulls its id from the author's
///   list; an author that no longer exists leaves nothing to clean up.
///
/// Missing messages are reported as `Ok(None)`, never as errors.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn list_messages(&self) -> StoreResult<Vec<Message>>;

    async fn find_message(&self, id: Uuid) -> StoreResult<Option<Message>>;

    async fn create_message(&self, new: NewMessage) -> StoreResult<Message>;

    /// Returns the stored state after the changes were applied
    async fn update_message(&self, id: Uuid, changes: MessageChanges) -> StoreResult<Option<Message>>;

    /// Returns the removed message
    async fn delete_message(&self, id: Uuid) -> StoreResult<Option<Message>>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    /// Put `message_id` at the front of the author's list, dropping any older
    /// occurrence. Safe to repeat. Returns false when the author does not exist.
    async fn link_message_to_author(&self, message_id: Uuid, author: Uuid) -> StoreResult<bool>;

    /// Remove `message_id` from the author's list if present. Safe to repeat.
    /// Returns false when the author does not exist.
    async fn unlink_message_from_author(&self, message_id: Uuid, author: Uuid) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;

    /// Release held resources on shutdown
    async fn close(&self) {}

    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;
}
