use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{Message, MessageChanges, NewMessage, NewUser, User};
use crate::database::store::{MessageStore, StoreError, StoreResult};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    messages: HashMap<Uuid, Message>,
}

impl Collections {
    fn link(&mut self, message_id: Uuid, author: Uuid) -> bool {
        match self.users.get_mut(&author) {
            Some(user) => {
                user.link_message(message_id);
                true
            }
            None => false,
        }
    }

    fn unlink(&mut self, message_id: Uuid, author: Uuid) -> bool {
        match self.users.get_mut(&author) {
            Some(user) => {
                user.unlink_message(message_id);
                true
            }
            None => false,
        }
    }
}

/// In-process `MessageStore`. Each operation holds the write lock for its
/// whole duration, so multi-step writes are never observed half done.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn list_messages(&self) -> StoreResult<Vec<Message>> {
        let data = self.inner.read().await;
        Ok(data.messages.values().cloned().collect())
    }

    async fn find_message(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let data = self.inner.read().await;
        Ok(data.messages.get(&id).cloned())
    }

    async fn create_message(&self, new: NewMessage) -> StoreResult<Message> {
        let mut data = self.inner.write().await;

        if !data.users.contains_key(&new.author) {
            return Err(StoreError::AuthorNotFound(new.author));
        }

        let message = new.into_message(Uuid::new_v4());
        data.messages.insert(message.id, message.clone());
        data.link(message.id, message.author);

        debug!("Created message {} for author {}", message.id, message.author);
        Ok(message)
    }

    async fn update_message(&self, id: Uuid, changes: MessageChanges) -> StoreResult<Option<Message>> {
        let mut data = self.inner.write().await;

        let Some(current) = data.messages.get(&id) else {
            return Ok(None);
        };
        if changes.is_empty() {
            return Ok(Some(current.clone()));
        }
        let current_author = current.author;

        if let Some(new_author) = changes.author.filter(|author| *author != current_author) {
            if !data.link(id, new_author) {
                return Err(StoreError::AuthorNotFound(new_author));
            }
            if !data.unlink(id, current_author) {
                debug!("Previous author {} of message {} no longer exists", current_author, id);
            }
        }

        let Some(message) = data.messages.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(message);

        debug!("Updated message {}", id);
        Ok(Some(message.clone()))
    }

    async fn delete_message(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let mut data = self.inner.write().await;

        let Some(message) = data.messages.remove(&id) else {
            return Ok(None);
        };

        if !data.unlink(message.id, message.author) {
            debug!("Author {} of message {} no longer exists; nothing to unlink", message.author, id);
        }

        debug!("Deleted message {}", id);
        Ok(Some(message))
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let data = self.inner.read().await;
        Ok(data.users.get(&id).cloned())
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut data = self.inner.write().await;

        if data.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::UsernameTaken(new.username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            password: new.password,
            messages: Vec::new(),
        };
        data.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn link_message_to_author(&self, message_id: Uuid, author: Uuid) -> StoreResult<bool> {
        Ok(self.inner.write().await.link(message_id, author))
    }

    async fn unlink_message_from_author(&self, message_id: Uuid, author: Uuid) -> StoreResult<bool> {
        Ok(self.inner.write().await.unlink(message_id, author))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
