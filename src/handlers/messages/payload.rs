// handlers/messages/payload.rs - Request bodies and their validation

use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::{MessageChanges, NewMessage};
use crate::error::ApiError;

/// POST /messages body
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

/// PUT /messages/:messageId body. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMessageRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
}

/// Parse the `:messageId` path segment
pub fn parse_message_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_field("messageId", format!("Invalid UUID format: {}", raw)))
}

impl CreateMessageRequest {
    pub fn validate(self) -> Result<NewMessage, ApiError> {
        let mut field_errors = HashMap::new();

        let title = required_text("title", self.title, &mut field_errors);
        let body = required_text("body", self.body, &mut field_errors);
        let author = match self.author {
            Some(raw) => parse_author(&raw, &mut field_errors),
            None => {
                field_errors.insert("author".to_string(), "This field is required".to_string());
                None
            }
        };

        match (title, body, author) {
            (Some(title), Some(body), Some(author)) if field_errors.is_empty() => {
                Ok(NewMessage { title, body, author })
            }
            _ => Err(ApiError::validation_error("Invalid message", Some(field_errors))),
        }
    }
}

impl UpdateMessageRequest {
    pub fn validate(self) -> Result<MessageChanges, ApiError> {
        let mut field_errors = HashMap::new();

        let title = self.title.and_then(|t| non_blank("title", t, &mut field_errors));
        let body = self.body.and_then(|b| non_blank("body", b, &mut field_errors));
        let author = self.author.and_then(|a| parse_author(&a, &mut field_errors));

        if !field_errors.is_empty() {
            return Err(ApiError::validation_error("Invalid message", Some(field_errors)));
        }
        Ok(MessageChanges { title, body, author })
    }
}

fn required_text(
    field: &str,
    value: Option<String>,
    field_errors: &mut HashMap<String, String>,
) -> Option<String> {
    match value {
        Some(v) => non_blank(field, v, field_errors),
        None => {
            field_errors.insert(field.to_string(), "This field is required".to_string());
            None
        }
    }
}

fn non_blank(field: &str, value: String, field_errors: &mut HashMap<String, String>) -> Option<String> {
    if value.trim().is_empty() {
        field_errors.insert(field.to_string(), "Must not be empty".to_string());
        return None;
    }
    Some(value)
}

fn parse_author(raw: &str, field_errors: &mut HashMap<String, String>) -> Option<Uuid> {
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            field_errors.insert("author".to_string(), format!("Invalid UUID format: {}", raw));
            None
        }
    }
}
