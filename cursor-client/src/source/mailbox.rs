//! In-memory page source over an ordered list of mailbox items.

use super::{PageSource, SourceError};
use async_trait::async_trait;
use mailcursor_types::{Anchor, CursorError, CursorResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Page source serving a fixed, ordered mailbox from memory.
///
/// Answers `End` past either edge. A single failure can be injected with
/// [`MailboxPageSource::fail_next_with`] to exercise recovery.
#[derive(Debug)]
pub struct MailboxPageSource {
    items: Vec<Anchor>,
    position: AtomicUsize,
    pending_failure: Mutex<Option<CursorError>>,
    disconnected: AtomicBool,
}

impl MailboxPageSource {
    /// Open the mailbox with the read position on `anchor`.
    pub fn open(items: Vec<Anchor>, anchor: &Anchor) -> Result<Self, SourceError> {
        let position = items
            .iter()
            .position(|item| item == anchor)
            .ok_or_else(|| SourceError::AnchorNotFound(anchor.clone()))?;
        Ok(Self {
            items,
            position: AtomicUsize::new(position),
            pending_failure: Mutex::new(None),
            disconnected: AtomicBool::new(false),
        })
    }

    /// Make the next probe, in either direction, fail with `error`.
    pub fn fail_next_with(&self, error: CursorError) {
        *self
            .pending_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// The item under the read position.
    pub fn position(&self) -> &Anchor {
        &self.items[self.position.load(Ordering::Acquire)]
    }

    /// Whether `disconnect()` has been called.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Acquire)
    }

    fn probe(&self, index: Option<usize>) -> CursorResult {
        if self.is_disconnected() {
            return CursorResult::Error(CursorError::Other("source disconnected".into()));
        }
        let failure = self
            .pending_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(err) = failure {
            return CursorResult::Error(err);
        }
        match index.and_then(|i| self.items.get(i)) {
            Some(anchor) => anchor.clone().into(),
            None => CursorResult::End,
        }
    }
}

#[async_trait]
impl PageSource for MailboxPageSource {
    async fn previous_page(&self) -> CursorResult {
        let position = self.position.load(Ordering::Acquire);
        self.probe(position.checked_sub(1))
    }

    async fn next_page(&self) -> CursorResult {
        let position = self.position.load(Ordering::Acquire);
        self.probe(position.checked_add(1))
    }

    async fn go_forwards(&self) {
        let last = self.items.len().saturating_sub(1);
        let moved = self
            .position
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| {
                (p < last).then_some(p + 1)
            });
        if moved.is_err() {
            tracing::debug!(position = %self.position(), "already on last item, not moving");
        }
    }

    async fn go_backwards(&self) {
        let moved = self
            .position
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| p.checked_sub(1));
        if moved.is_err() {
            tracing::debug!(position = %self.position(), "already on first item, not moving");
        }
    }

    fn disconnect(&self) {
        self.disconnected.store(true, Ordering::Release);
    }
}
