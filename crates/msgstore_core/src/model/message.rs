//! Message domain model.
//!
//! # Responsibility
//! - Define the only record shape stored in the `message` table.
//! - Distinguish transient (unsaved) from persisted messages via `id`.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `text` is the only mutable field; its content is not constrained.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier (`message.id`).
pub type MessageId = i64;

/// A single text message, either transient or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `None` until the message has been created in the store.
    pub id: Option<MessageId>,
    pub text: String,
}

impl Message {
    /// Creates a transient message that has not been persisted yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    /// Creates a message bound to an existing store id.
    ///
    /// Used by row mapping and by callers addressing a known row for update.
    pub fn with_id(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            text: text.into(),
        }
    }

    /// Returns whether the store has assigned an id to this message.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Message;

    #[test]
    fn new_message_is_transient() {
        let message = Message::new("hello");
        assert_eq!(message.id, None);
        assert_eq!(message.text, "hello");
        assert!(!message.is_persisted());
    }

    #[test]
    fn with_id_message_is_persisted() {
        let message = Message::with_id(7, "hello");
        assert_eq!(message.id, Some(7));
        assert!(message.is_persisted());
    }

    #[test]
    fn serializes_with_nullable_id() {
        let transient = serde_json::to_value(Message::new("draft")).unwrap();
        assert_eq!(transient, serde_json::json!({ "id": null, "text": "draft" }));

        let persisted: Message = serde_json::from_str(r#"{"id": 3, "text": "saved"}"#).unwrap();
        assert_eq!(persisted, Message::with_id(3, "saved"));
    }
}
