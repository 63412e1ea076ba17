use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Identifiers of the messages this user authored, newest first
    pub messages: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl User {
    /// Move `message_id` to the front of the owned list. Returns false if it was already there.
    pub fn link_message(&mut self, message_id: Uuid) -> bool {
        if self.messages.first() == Some(&message_id) {
            return false;
        }
        self.messages.retain(|id| *id != message_id);
        self.messages.insert(0, message_id);
        true
    }

    /// Drop every occurrence of `message_id`. Returns false if it was not present.
    pub fn unlink_message(&mut self, message_id: Uuid) -> bool {
        let before = self.messages.len();
        self.messages.retain(|id| *id != message_id);
        self.messages.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "myuser".into(),
            password: "mypassword".into(),
            messages: Vec::new(),
        }
    }

    #[test]
    fn link_prepends_and_is_idempotent() {
        let mut u = user();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert!(u.link_message(first));
        assert!(u.link_message(second));
        assert!(!u.link_message(second));
        assert_eq!(u.messages, vec![second, first]);

        // Re-linking an older entry moves it to the front without duplicating it
        assert!(u.link_message(first));
        assert_eq!(u.messages, vec![first, second]);
    }

    #[test]
    fn unlink_removes_by_identifier() {
        let mut u = user();
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        u.link_message(keep);
        u.link_message(drop);

        assert!(u.unlink_message(drop));
        assert!(!u.unlink_message(drop));
        assert_eq!(u.messages, vec![keep]);
    }

    #[test]
    fn password_is_never_serialized() {
        let v = serde_json::to_value(user()).unwrap();
        assert!(v.get("password").is_none());
        assert_eq!(v["username"], "myuser");
    }
}
