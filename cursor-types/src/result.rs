//! Result of a single page probe.

use serde::{Deserialize, Serialize};

use crate::error::CursorError;
use crate::ids::{Anchor, ConversationId, MessageId};

/// What a page probe found in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorResult {
    /// A resolved mailbox position.
    Cursor {
        /// The conversation at this position.
        conversation_id: ConversationId,
        /// The message at this position, in message mode.
        message_id: Option<MessageId>,
    },
    /// No further items in that direction.
    End,
    /// The probe failed.
    Error(CursorError),
}

impl CursorResult {
    /// A position on a whole conversation.
    pub fn conversation(id: impl Into<ConversationId>) -> Self {
        Self::Cursor {
            conversation_id: id.into(),
            message_id: None,
        }
    }

    /// A position on one message of a conversation.
    pub fn message(conversation: impl Into<ConversationId>, message: impl Into<MessageId>) -> Self {
        Self::Cursor {
            conversation_id: conversation.into(),
            message_id: Some(message.into()),
        }
    }

    /// Shorthand for `Error(CursorError::Offline)`.
    pub fn offline() -> Self {
        Self::Error(CursorError::Offline)
    }

    /// Check if this is the end-of-list sentinel.
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Check if the probe failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The error, if the probe failed.
    pub fn error(&self) -> Option<&CursorError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// The conversation at this position, if resolved.
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        match self {
            Self::Cursor {
                conversation_id, ..
            } => Some(conversation_id),
            _ => None,
        }
    }

    /// Convert a resolved position back into an [`Anchor`].
    pub fn as_anchor(&self) -> Option<Anchor> {
        match self {
            Self::Cursor {
                conversation_id,
                message_id,
            } => Some(Anchor {
                conversation_id: conversation_id.clone(),
                message_id: message_id.clone(),
            }),
            _ => None,
        }
    }
}

impl From<Anchor> for CursorResult {
    fn from(anchor: Anchor) -> Self {
        Self::Cursor {
            conversation_id: anchor.conversation_id,
            message_id: anchor.message_id,
        }
    }
}

impl From<CursorError> for CursorResult {
    fn from(err: CursorError) -> Self {
        Self::Error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_converts_to_cursor() {
        let result = CursorResult::from(Anchor::message("100", "m1"));
        assert_eq!(result, CursorResult::message("100", "m1"));
        assert_eq!(result.conversation_id(), Some(&ConversationId::from("100")));
        assert_eq!(result.as_anchor(), Some(Anchor::message("100", "m1")));
    }

    #[test]
    fn sentinels_have_no_position() {
        assert!(CursorResult::End.is_end());
        assert!(CursorResult::End.as_anchor().is_none());
        assert!(CursorResult::offline().is_error());
        assert_eq!(CursorResult::offline().error(), Some(&CursorError::Offline));
        assert!(CursorResult::offline().conversation_id().is_none());
    }
}
