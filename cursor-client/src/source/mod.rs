//! Page source abstraction for the mailbox cursor.
//!
//! A page source is the mail engine's view of an ordered mailbox with a
//! read position. The cursor never learns how items are fetched, decrypted
//! or ordered; it only asks for the neighbors of the read position and
//! moves that position by one.
//!
//! # Design
//!
//! The trait is async and position-oriented:
//! - `previous_page()` / `next_page()` probe the neighbors of the read position
//! - `go_forwards()` / `go_backwards()` move the read position by one
//! - `disconnect()` releases the engine-side resources
//!
//! Probe failures are returned as [`CursorResult::Error`], not as `Err`.
//!
//! # Example
//!
//! ```ignore
//! let source = MailboxPageSource::open(items, &anchor)?;
//! let next = source.next_page().await;
//! source.go_forwards().await;
//! ```

mod mailbox;
mod mock;

pub use mailbox::MailboxPageSource;
pub use mock::{MockPageSource, SourceCall};

use async_trait::async_trait;
use mailcursor_types::{Anchor, CursorResult};
use thiserror::Error;

/// Errors building a page source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The anchor is not part of the mailbox.
    #[error("anchor not found in mailbox: {0}")]
    AnchorNotFound(Anchor),
}

/// Paged, positioned reads over an ordered mailbox.
///
/// Implementations are owned by exactly one cursor. They may be called from
/// any task, and both probes may be in flight at once while the cursor
/// primes its neighbors.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Probe the item before the read position.
    async fn previous_page(&self) -> CursorResult;

    /// Probe the item after the read position.
    async fn next_page(&self) -> CursorResult;

    /// Move the read position one item forwards.
    async fn go_forwards(&self);

    /// Move the read position one item backwards.
    async fn go_backwards(&self);

    /// Release the engine-side resources behind this source.
    fn disconnect(&self);
}
