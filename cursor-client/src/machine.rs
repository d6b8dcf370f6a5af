//! CursorStateMachine - windowed navigation over a page source.
//!
//! This module provides [`CursorStateMachine`], the live cursor a mailbox
//! view reads from while the user swipes between conversations.
//!
//! # Architecture
//!
//! The machine uses the pure window planner (from cursor-core) to decide
//! what each move must do, and interprets the resulting step against the
//! [`PageSource`].
//!
//! ```text
//! UI → CursorStateMachine → PageSource → mail engine
//!            ↓
//!      cursor-core (pure window planner)
//! ```
//!
//! Every mutation runs under a single navigation lock, so moves queue in
//! arrival order. The window itself lives in a `watch` channel: reads never
//! wait for the lock and always see the last completed move. A move builds
//! its new window locally and publishes it once its source calls are done.
//!
//! # Example
//!
//! ```ignore
//! let cursor = CursorStateMachine::new(anchor, source);
//! cursor.settled().await;
//! cursor.move_forward().await;
//! let shown = cursor.current();
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use mailcursor_core::{recover, CursorWindow, Direction, RefetchOutcome, Step};
use mailcursor_types::{Anchor, CursorResult};
use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;

use crate::lifecycle::EphemeralCursor;
use crate::source::PageSource;

/// Sliding previous / current / next window over a paged mailbox.
///
/// Navigation never fails: probe errors end up in the slots as
/// [`CursorResult::Error`] values for the UI to render.
pub struct CursorStateMachine<S: PageSource> {
    anchor: Anchor,
    source: S,
    navigation: Arc<Mutex<()>>,
    window: watch::Sender<CursorWindow>,
    disconnected: AtomicBool,
    priming: OnceLock<AbortHandle>,
}

impl<S: PageSource> CursorStateMachine<S> {
    /// Create a cursor sitting on `anchor` and start probing its neighbors.
    ///
    /// `current` is set before this returns. The neighbor probes run on a
    /// spawned task that holds the navigation lock, so moves issued right
    /// away wait for them. Must be called within a tokio runtime.
    pub fn new(anchor: Anchor, source: S) -> Arc<Self> {
        let (window, _) = watch::channel(CursorWindow::new(anchor.clone()));
        let machine = Arc::new(Self {
            anchor,
            source,
            navigation: Arc::new(Mutex::new(())),
            window,
            disconnected: AtomicBool::new(false),
            priming: OnceLock::new(),
        });

        let held = Arc::clone(&machine.navigation).try_lock_owned().ok();
        let worker = Arc::clone(&machine);
        let task = tokio::spawn(async move {
            let _guard = match held {
                Some(guard) => guard,
                None => Arc::clone(&worker.navigation).lock_owned().await,
            };
            worker.prime().await;
        });
        let _ = machine.priming.set(task.abort_handle());

        machine
    }

    /// The anchor this cursor was opened on.
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Copy of the whole window as of the last completed update.
    pub fn snapshot(&self) -> CursorWindow {
        self.window.borrow().clone()
    }

    /// The item being displayed.
    pub fn current(&self) -> CursorResult {
        self.window.borrow().current.clone()
    }

    /// The item before current, `None` while unloaded.
    pub fn previous(&self) -> Option<CursorResult> {
        self.window.borrow().previous.clone()
    }

    /// The item after current, `None` while unloaded.
    pub fn next(&self) -> Option<CursorResult> {
        self.window.borrow().next.clone()
    }

    /// Get a reference to the underlying page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver notified after every window update.
    pub fn subscribe(&self) -> watch::Receiver<CursorWindow> {
        self.window.subscribe()
    }

    /// Wait until every mutation queued so far, priming included, is done.
    pub async fn settled(&self) {
        let _guard = self.navigation.lock().await;
    }

    /// Check if `disconnect()` has been called.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Acquire)
    }

    /// Move one item forwards.
    pub async fn move_forward(&self) {
        self.step(Direction::Forward).await;
    }

    /// Move one item backwards.
    pub async fn move_backward(&self) {
        self.step(Direction::Backward).await;
    }

    /// Re-probe the previous slot, ignoring whatever it holds now.
    ///
    /// Used when the mailbox may have changed shape ahead of the user, e.g.
    /// after items before current were moved or deleted.
    ///
    /// Ignored while current is `End`: the source still sits on the item
    /// the cursor arrived from, so a probe there would answer for the
    /// wrong slot.
    pub async fn invalidate_previous(&self) {
        let _guard = self.navigation.lock().await;
        if self.is_disconnected() {
            tracing::debug!(anchor = %self.anchor, "invalidate on disconnected cursor ignored");
            return;
        }
        let on_end = self.window.borrow().current.is_end();
        if on_end {
            tracing::debug!(anchor = %self.anchor, "invalidate on End ignored");
            return;
        }
        let fetched = self.probe(Direction::Backward).await;
        self.window
            .send_modify(|w| w.set_ahead(Direction::Backward, fetched));
    }

    /// Release the page source. Idempotent.
    ///
    /// Aborts a priming task still in flight. Later moves are ignored.
    pub fn disconnect(&self) {
        if self.disconnected.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(task) = self.priming.get() {
            task.abort();
        }
        self.source.disconnect();
        tracing::debug!(anchor = %self.anchor, "cursor disconnected");
    }

    async fn prime(&self) {
        let (previous, next) = tokio::join!(
            self.probe(Direction::Backward),
            self.probe(Direction::Forward)
        );
        self.window.send_modify(|w| {
            w.previous = previous;
            w.next = next;
        });
        tracing::debug!(anchor = %self.anchor, window = ?self.snapshot(), "cursor primed");
    }

    async fn step(&self, direction: Direction) {
        let _guard = self.navigation.lock().await;
        if self.is_disconnected() {
            tracing::debug!(anchor = %self.anchor, ?direction, "move on disconnected cursor ignored");
            return;
        }

        let mut window = self.snapshot();
        let step = window.plan(direction);
        tracing::debug!(anchor = %self.anchor, ?direction, ?step, "moving");

        match step {
            Step::Stay => {}
            Step::ShiftIntoEnd => {
                window.shift(direction);
                self.window.send_replace(window);
            }
            Step::StepOffEnd => {
                // The source never moved onto the End, so only the far slot
                // needs a fresh probe.
                window.shift(direction);
                let fetched = self.probe(direction).await;
                window.set_ahead(direction, fetched);
                self.window.send_replace(window);
            }
            Step::Refetch => match RefetchOutcome::from(self.fetch(direction).await) {
                RefetchOutcome::Advance(item) => {
                    window.set_ahead(direction, Some(item));
                    self.shift_and_advance(window, direction).await;
                }
                RefetchOutcome::IntoEnd => {
                    window.set_ahead(direction, Some(CursorResult::End));
                    window.shift(direction);
                    self.window.send_replace(window);
                }
                RefetchOutcome::Retry => {
                    tracing::debug!(anchor = %self.anchor, ?direction, "still offline, move deferred");
                }
            },
            Step::ShiftAndAdvance => self.shift_and_advance(window, direction).await,
        }
    }

    /// Shift `window`, advance the source, then refill the slot ahead.
    ///
    /// Nothing is published until the advance completes. From then on the
    /// shifted window is published even if the refill is cancelled.
    async fn shift_and_advance(&self, mut window: CursorWindow, direction: Direction) {
        window.shift(direction);
        self.advance(direction).await;
        let pending = PendingShift {
            sender: &self.window,
            window: Some(window),
        };
        let fetched = self.probe(direction).await;
        pending.publish(direction, fetched);
    }

    /// Fetch the neighbor in `direction` through the recovery policy.
    async fn probe(&self, direction: Direction) -> Option<CursorResult> {
        let result = self.fetch(direction).await;
        if let CursorResult::Error(err) = &result {
            if err.is_recoverable() {
                tracing::debug!(anchor = %self.anchor, ?direction, "probe offline, retry on next move");
            } else {
                tracing::warn!(anchor = %self.anchor, ?direction, error = %err, "probe failed");
            }
        }
        recover(result)
    }

    async fn fetch(&self, direction: Direction) -> CursorResult {
        match direction {
            Direction::Forward => self.source.next_page().await,
            Direction::Backward => self.source.previous_page().await,
        }
    }

    async fn advance(&self, direction: Direction) {
        match direction {
            Direction::Forward => self.source.go_forwards().await,
            Direction::Backward => self.source.go_backwards().await,
        }
    }
}

/// A shifted window whose source advance has completed.
///
/// Dropped before [`PendingShift::publish`], it publishes the window with
/// the slot ahead unloaded.
struct PendingShift<'a> {
    sender: &'a watch::Sender<CursorWindow>,
    window: Option<CursorWindow>,
}

impl PendingShift<'_> {
    fn publish(mut self, direction: Direction, ahead: Option<CursorResult>) {
        if let Some(mut window) = self.window.take() {
            window.set_ahead(direction, ahead);
            self.sender.send_replace(window);
        }
    }
}

impl Drop for PendingShift<'_> {
    fn drop(&mut self) {
        if let Some(window) = self.window.take() {
            self.sender.send_replace(window);
        }
    }
}

impl<S: PageSource> EphemeralCursor for CursorStateMachine<S> {
    fn disconnect(&self) {
        CursorStateMachine::disconnect(self);
    }
}

impl<S: PageSource> Drop for CursorStateMachine<S> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<S: PageSource> fmt::Debug for CursorStateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorStateMachine")
            .field("anchor", &self.anchor)
            .field("window", &*self.window.borrow())
            .field("disconnected", &self.is_disconnected())
            .finish()
    }
}
