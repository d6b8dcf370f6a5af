//! Configuration for the cursor session lifecycle.

use std::time::Duration;

/// Default time a cursor survives without observers (5 seconds).
pub const DEFAULT_TEARDOWN_GRACE: Duration = Duration::from_secs(5);

/// Configuration for [`crate::EphemeralCursorLifecycleManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// How long the stream may go without observers before the held
    /// cursor is disconnected.
    pub teardown_grace: Duration,
}

impl LifecycleConfig {
    /// Set the teardown grace window.
    pub fn with_teardown_grace(mut self, grace: Duration) -> Self {
        self.teardown_grace = grace;
        self
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            teardown_grace: DEFAULT_TEARDOWN_GRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grace_is_five_seconds() {
        assert_eq!(LifecycleConfig::default().teardown_grace, Duration::from_secs(5));
    }

    #[test]
    fn builder_overrides_grace() {
        let config = LifecycleConfig::default().with_teardown_grace(Duration::from_millis(500));
        assert_eq!(config.teardown_grace, Duration::from_millis(500));
    }
}
