//! Identity types for mailbox positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a conversation in a mailbox.
///
/// Opaque to this crate; the mail engine assigns it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Create a ConversationId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConversationId({})", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a single message inside a conversation.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Create a MessageId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where a browsing session starts.
///
/// A conversation, optionally narrowed to one message when the mailbox is
/// displayed in message mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    /// The conversation the session opens on.
    pub conversation_id: ConversationId,
    /// The message inside the conversation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
}

impl Anchor {
    /// Anchor on a whole conversation.
    pub fn conversation(id: impl Into<ConversationId>) -> Self {
        Self {
            conversation_id: id.into(),
            message_id: None,
        }
    }

    /// Anchor on one message of a conversation.
    pub fn message(conversation: impl Into<ConversationId>, message: impl Into<MessageId>) -> Self {
        Self {
            conversation_id: conversation.into(),
            message_id: Some(message.into()),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message_id {
            Some(message) => write!(f, "{}/{}", self.conversation_id, message),
            None => write!(f, "{}", self.conversation_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_id_display_is_raw() {
        let id = ConversationId::from("100");
        assert_eq!(id.to_string(), "100");
        assert_eq!(format!("{:?}", id), "ConversationId(100)");
    }

    #[test]
    fn anchor_display_includes_message() {
        assert_eq!(Anchor::conversation("100").to_string(), "100");
        assert_eq!(Anchor::message("100", "m7").to_string(), "100/m7");
    }

    #[test]
    fn anchor_json_omits_missing_message() {
        let json = serde_json::to_string(&Anchor::conversation("42")).unwrap();
        assert_eq!(json, r#"{"conversation_id":"42"}"#);

        let parsed: Anchor =
            serde_json::from_str(r#"{"conversation_id":"42","message_id":"m1"}"#).unwrap();
        assert_eq!(parsed, Anchor::message("42", "m1"));
    }
}
