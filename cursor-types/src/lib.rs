//! # cursor-types
//!
//! Data model for the mailbox cursor.
//!
//! This crate provides the foundational types used across all mailcursor crates:
//! - [`ConversationId`], [`MessageId`], [`Anchor`] - Identity of a mailbox position
//! - [`CursorResult`] - Outcome of a single page probe
//! - [`CursorError`] - Probe failure taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod result;

pub use error::CursorError;
pub use ids::{Anchor, ConversationId, MessageId};
pub use result::CursorResult;
