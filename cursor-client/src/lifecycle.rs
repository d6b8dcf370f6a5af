//! Session-scoped ownership of the live cursor.
//!
//! A mailbox view and its conversation pager both want the same cursor.
//! [`EphemeralCursorLifecycleManager`] holds at most one, publishes it to
//! every observer, and disconnects it once nobody has been watching for the
//! configured grace window.
//!
//! The published state lives in a `watch` channel, so a new observer always
//! starts from the latest value. Teardown is driven by the channel's own
//! "all receivers dropped" signal, which absorbs subscribe/unsubscribe churn
//! without any bookkeeping of who is watching.

use std::sync::Arc;

use mailcursor_core::EphemeralCursorState;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::config::LifecycleConfig;

/// A cursor the lifecycle manager can tear down.
pub trait EphemeralCursor: Send + Sync + 'static {
    /// Release everything the cursor holds. Called at most once per
    /// instance by the manager.
    fn disconnect(&self);
}

/// State as seen by observers of a [`EphemeralCursorLifecycleManager`].
pub type SessionState<C> = EphemeralCursorState<Arc<C>>;

struct Shared<C> {
    state: watch::Sender<SessionState<C>>,
    subscribed: Notify,
}

impl<C: EphemeralCursor> Shared<C> {
    /// Clear the held cursor and disconnect it.
    fn release(&self) -> bool {
        let mut released = None;
        self.state.send_if_modified(|state| {
            released = state.take();
            released.is_some()
        });
        match released {
            Some(cursor) => {
                cursor.disconnect();
                true
            }
            None => false,
        }
    }
}

/// Owns the single live cursor of a mailbox browsing session.
pub struct EphemeralCursorLifecycleManager<C: EphemeralCursor> {
    shared: Arc<Shared<C>>,
    teardown: JoinHandle<()>,
}

impl<C: EphemeralCursor> EphemeralCursorLifecycleManager<C> {
    /// Create a manager with the default grace window.
    ///
    /// Must be called within a tokio runtime.
    pub fn new() -> Self {
        Self::with_config(LifecycleConfig::default())
    }

    /// Create a manager with an explicit configuration.
    pub fn with_config(config: LifecycleConfig) -> Self {
        let (state, _) = watch::channel(EphemeralCursorState::NotInitialised);
        let shared = Arc::new(Shared {
            state,
            subscribed: Notify::new(),
        });
        let teardown = tokio::spawn(watch_subscribers(
            Arc::clone(&shared),
            config.teardown_grace,
        ));
        Self { shared, teardown }
    }

    /// Publish `cursor` as the live cursor of the session.
    ///
    /// A different cursor held before is disconnected. Publishing the same
    /// instance again only notifies observers.
    pub fn set_ephemeral_cursor(&self, cursor: Arc<C>) {
        let replaced = self
            .shared
            .state
            .send_replace(EphemeralCursorState::Data(Arc::clone(&cursor)));
        tracing::info!("ephemeral cursor published");
        if let EphemeralCursorState::Data(old) = replaced {
            if !Arc::ptr_eq(&old, &cursor) {
                tracing::debug!("replaced cursor disconnected");
                old.disconnect();
            }
        }
    }

    /// End the session now: publish `CursorDead` and disconnect the cursor.
    ///
    /// Does nothing if no cursor is held.
    pub fn clear_ephemeral_cursor(&self) {
        if self.shared.release() {
            tracing::info!("ephemeral cursor cleared");
        }
    }

    /// Start observing the session.
    ///
    /// The first [`CursorObserver::recv`] yields the latest state.
    pub fn observe_cursor(&self) -> CursorObserver<C> {
        let mut rx = self.shared.state.subscribe();
        rx.mark_changed();
        self.shared.subscribed.notify_one();
        CursorObserver { rx }
    }

    /// The state as of now.
    pub fn current_state(&self) -> SessionState<C> {
        self.shared.state.borrow().clone()
    }

    /// Number of live observers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.state.receiver_count()
    }
}

impl<C: EphemeralCursor> Default for EphemeralCursorLifecycleManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EphemeralCursor> Drop for EphemeralCursorLifecycleManager<C> {
    fn drop(&mut self) {
        self.teardown.abort();
        self.shared.release();
    }
}

/// Tear the cursor down once observers have been gone for `grace`.
///
/// Armed by the first observer; re-armed by every later one.
async fn watch_subscribers<C: EphemeralCursor>(shared: Arc<Shared<C>>, grace: std::time::Duration) {
    loop {
        shared.subscribed.notified().await;
        loop {
            shared.state.closed().await;
            tokio::select! {
                _ = tokio::time::sleep(grace) => {
                    if shared.state.receiver_count() == 0 {
                        break;
                    }
                }
                _ = shared.subscribed.notified() => {}
            }
        }
        if shared.release() {
            tracing::info!(grace_ms = grace.as_millis() as u64, "no observers left, cursor torn down");
        }
    }
}

/// A live view of the session state.
///
/// Dropping the last observer starts the teardown grace window.
pub struct CursorObserver<C> {
    rx: watch::Receiver<SessionState<C>>,
}

impl<C> CursorObserver<C> {
    /// Wait for the next state.
    ///
    /// Returns the latest state immediately on the first call. Returns
    /// `None` once the manager is gone.
    pub async fn recv(&mut self) -> Option<SessionState<C>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// The state as of now, without waiting.
    pub fn current(&self) -> SessionState<C> {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::CursorStateMachine;
    use crate::source::{MockPageSource, SourceCall};
    use mailcursor_types::{Anchor, CursorResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingCursor {
        disconnects: AtomicUsize,
    }

    impl CountingCursor {
        fn disconnects(&self) -> usize {
            self.disconnects.load(Ordering::SeqCst)
        }
    }

    impl EphemeralCursor for CountingCursor {
        fn disconnect(&self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn manager(grace_ms: u64) -> EphemeralCursorLifecycleManager<CountingCursor> {
        EphemeralCursorLifecycleManager::with_config(
            LifecycleConfig::default().with_teardown_grace(Duration::from_millis(grace_ms)),
        )
    }

    // ===========================================
    // Publishing
    // ===========================================

    #[tokio::test]
    async fn observer_sees_not_initialised_then_data() {
        let manager = manager(500);
        let mut observer = manager.observe_cursor();

        let first = observer.recv().await.unwrap();
        assert!(matches!(first, EphemeralCursorState::NotInitialised));

        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        let second = observer.recv().await.unwrap();
        assert!(Arc::ptr_eq(second.cursor().unwrap(), &cursor));
    }

    #[tokio::test]
    async fn late_observer_replays_latest() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        let mut observer = manager.observe_cursor();
        let state = observer.recv().await.unwrap();

        assert!(Arc::ptr_eq(state.cursor().unwrap(), &cursor));
        assert!(observer.current().is_initialised());
    }

    #[tokio::test]
    async fn setting_new_cursor_disconnects_old() {
        let manager = manager(500);
        let first = Arc::new(CountingCursor::default());
        let second = Arc::new(CountingCursor::default());

        manager.set_ephemeral_cursor(Arc::clone(&first));
        manager.set_ephemeral_cursor(Arc::clone(&second));

        assert_eq!(first.disconnects(), 1);
        assert_eq!(second.disconnects(), 0);
        assert!(Arc::ptr_eq(
            manager.current_state().cursor().unwrap(),
            &second
        ));
    }

    #[tokio::test]
    async fn setting_same_cursor_keeps_it_alive() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());

        manager.set_ephemeral_cursor(Arc::clone(&cursor));
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        assert_eq!(cursor.disconnects(), 0);
    }

    #[tokio::test]
    async fn clear_publishes_cursor_dead() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));
        let mut observer = manager.observe_cursor();
        observer.recv().await.unwrap();

        manager.clear_ephemeral_cursor();
        manager.clear_ephemeral_cursor();

        let state = observer.recv().await.unwrap();
        assert!(matches!(state, EphemeralCursorState::CursorDead));
        assert_eq!(cursor.disconnects(), 1);
    }

    #[tokio::test]
    async fn recv_ends_when_manager_dropped() {
        let manager = manager(500);
        let mut observer = manager.observe_cursor();
        observer.recv().await.unwrap();

        drop(manager);

        assert!(observer.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropping_manager_disconnects_held_cursor() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        drop(manager);

        assert_eq!(cursor.disconnects(), 1);
    }

    // ===========================================
    // Teardown
    // ===========================================

    #[tokio::test(start_paused = true)]
    async fn teardown_after_last_observer_and_grace() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        let observer = manager.observe_cursor();
        assert_eq!(manager.subscriber_count(), 1);
        drop(observer);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(cursor.disconnects(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(cursor.disconnects(), 1);
        assert!(matches!(
            manager.current_state(),
            EphemeralCursorState::CursorDead
        ));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(cursor.disconnects(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resubscribing_within_grace_keeps_cursor() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        drop(manager.observe_cursor());
        tokio::time::sleep(Duration::from_millis(300)).await;
        let observer = manager.observe_cursor();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(cursor.disconnects(), 0);

        drop(observer);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(cursor.disconnects(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn churn_disconnects_exactly_once() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        for _ in 0..20 {
            let a = manager.observe_cursor();
            let b = manager.observe_cursor();
            tokio::time::sleep(Duration::from_millis(10)).await;
            drop(a);
            drop(b);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(cursor.disconnects(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(cursor.disconnects(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unobserved_cursor_is_not_torn_down() {
        let manager = manager(500);
        let cursor = Arc::new(CountingCursor::default());
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(cursor.disconnects(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_releases_page_source() {
        let manager = EphemeralCursorLifecycleManager::with_config(
            LifecycleConfig::default().with_teardown_grace(Duration::from_millis(500)),
        );
        let source = MockPageSource::new();
        source.queue_next(CursorResult::conversation("200"));
        let cursor = CursorStateMachine::new(Anchor::conversation("100"), source.clone());
        cursor.settled().await;
        manager.set_ephemeral_cursor(Arc::clone(&cursor));

        let observer = manager.observe_cursor();
        drop(observer);
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(cursor.is_disconnected());
        assert_eq!(source.count(SourceCall::Disconnect), 1);
    }
}
