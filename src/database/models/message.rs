use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored message. Serialized with `_id` to keep the document shape clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author: Uuid,
}

/// Validated input for a new message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub title: String,
    pub body: String,
    pub author: Uuid,
}

impl NewMessage {
    pub fn into_message(self, id: Uuid) -> Message {
        Message {
            id,
            title: self.title,
            body: self.body,
            author: self.author,
        }
    }
}

/// Fields to overwrite on an existing message; `None` leaves the stored value alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<Uuid>,
}

impl MessageChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.author.is_none()
    }

    /// Apply the changes in place
    pub fn apply_to(self, message: &mut Message) {
        if let Some(title) = self.title {
            message.title = title;
        }
        if let Some(body) = self.body {
            message.body = body;
        }
        if let Some(author) = self.author {
            message.author = author;
        }
    }
}
