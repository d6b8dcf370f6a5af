//! Mock page source for testing.
//!
//! Allows scripting probe results and recording every call for verification.

use super::PageSource;
use async_trait::async_trait;
use mailcursor_types::CursorResult;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call made against a [`MockPageSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCall {
    /// `previous_page()`
    PreviousPage,
    /// `next_page()`
    NextPage,
    /// `go_forwards()`
    GoForwards,
    /// `go_backwards()`
    GoBackwards,
    /// `disconnect()`
    Disconnect,
}

/// Mock page source for testing.
///
/// Probes pop scripted results in order; once a direction's script is
/// exhausted it answers `End`. Clones share state, so a test can keep a
/// handle after moving the source into a cursor.
#[derive(Debug, Default)]
pub struct MockPageSource {
    inner: Arc<Mutex<MockPageSourceInner>>,
}

#[derive(Debug, Default)]
struct MockPageSourceInner {
    previous_results: VecDeque<CursorResult>,
    next_results: VecDeque<CursorResult>,
    calls: Vec<SourceCall>,
    latency: Option<Duration>,
}

impl MockPageSource {
    /// Create a new mock page source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for a later `previous_page()` call.
    pub fn queue_previous(&self, result: CursorResult) -> &Self {
        let mut inner = self.inner.lock().unwrap();
        inner.previous_results.push_back(result);
        self
    }

    /// Queue a result for a later `next_page()` call.
    pub fn queue_next(&self, result: CursorResult) -> &Self {
        let mut inner = self.inner.lock().unwrap();
        inner.next_results.push_back(result);
        self
    }

    /// Make every async call sleep for `latency` before answering.
    pub fn set_latency(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.latency = Some(latency);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<SourceCall> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// Number of times `call` was made.
    pub fn count(&self, call: SourceCall) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.calls.iter().filter(|c| **c == call).count()
    }

    /// Forget recorded calls, keeping scripted results.
    pub fn clear_calls(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.clear();
    }

    fn record(&self, call: SourceCall) -> Option<Duration> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        inner.latency
    }

    async fn delay(latency: Option<Duration>) {
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Clone for MockPageSource {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn previous_page(&self) -> CursorResult {
        Self::delay(self.record(SourceCall::PreviousPage)).await;
        let mut inner = self.inner.lock().unwrap();
        inner.previous_results.pop_front().unwrap_or(CursorResult::End)
    }

    async fn next_page(&self) -> CursorResult {
        Self::delay(self.record(SourceCall::NextPage)).await;
        let mut inner = self.inner.lock().unwrap();
        inner.next_results.pop_front().unwrap_or(CursorResult::End)
    }

    async fn go_forwards(&self) {
        Self::delay(self.record(SourceCall::GoForwards)).await;
    }

    async fn go_backwards(&self) {
        Self::delay(self.record(SourceCall::GoBackwards)).await;
    }

    fn disconnect(&self) {
        self.record(SourceCall::Disconnect);
    }
}
