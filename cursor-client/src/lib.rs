//! # cursor-client
//!
//! Async mailbox cursor built on an opaque, paged mail engine.
//!
//! This is the library a mail UI talks to while the user swipes between
//! conversations.
//!
//! ## Features
//!
//! - **Sliding Window**: previous / current / next slots with one-page lookahead
//! - **Serialized Navigation**: one mutation at a time per cursor, in arrival order
//! - **Two-Tier Recovery**: offline probes are retried, other failures kept as data
//! - **Session Lifecycle**: one shared live cursor, torn down after observers leave
//! - **Page Source Abstraction**: pluggable engine access (in-memory, mock)
//!
//! ## Example
//!
//! ```ignore
//! use mailcursor_client::{CursorStateMachine, EphemeralCursorLifecycleManager, MailboxPageSource};
//!
//! let source = MailboxPageSource::open(items, &anchor)?;
//! let cursor = CursorStateMachine::new(anchor, source);
//!
//! let sessions = EphemeralCursorLifecycleManager::new();
//! sessions.set_ephemeral_cursor(cursor);
//! let mut observer = sessions.observe_cursor();
//! while let Some(state) = observer.recv().await {
//!     // render state
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod lifecycle;
pub mod machine;
pub mod source;

pub use config::{LifecycleConfig, DEFAULT_TEARDOWN_GRACE};
pub use lifecycle::{CursorObserver, EphemeralCursor, EphemeralCursorLifecycleManager, SessionState};
pub use machine::CursorStateMachine;
pub use source::{MailboxPageSource, MockPageSource, PageSource, SourceCall, SourceError};

pub use mailcursor_core::{CursorWindow, Direction, EphemeralCursorState};
pub use mailcursor_types::{Anchor, ConversationId, CursorError, CursorResult, MessageId};
