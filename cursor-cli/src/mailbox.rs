//! Mailbox fixture files.
//!
//! A fixture is a JSON array of anchors in mailbox order:
//!
//! ```json
//! [{"conversation_id": "50"}, {"conversation_id": "100", "message_id": "m1"}]
//! ```

use anyhow::{Context, Result};
use mailcursor_client::{Anchor, MessageId};
use std::path::Path;

/// Load an ordered mailbox from a fixture file.
pub async fn load(path: &Path) -> Result<Vec<Anchor>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read mailbox fixture {}", path.display()))?;
    let items = parse(&contents)
        .with_context(|| format!("Invalid mailbox fixture {}", path.display()))?;
    tracing::debug!(path = %path.display(), items = items.len(), "mailbox loaded");
    Ok(items)
}

/// Parse fixture contents.
pub fn parse(contents: &str) -> Result<Vec<Anchor>> {
    let items: Vec<Anchor> = serde_json::from_str(contents)?;
    if items.is_empty() {
        anyhow::bail!("mailbox is empty");
    }
    Ok(items)
}

/// Build the anchor named on the command line.
pub fn anchor(conversation: &str, message: Option<&str>) -> Anchor {
    Anchor {
        conversation_id: conversation.into(),
        message_id: message.map(MessageId::from),
    }
}
