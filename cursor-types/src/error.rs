//! Probe error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a page probe failed.
///
/// Errors are carried as data inside [`crate::CursorResult`], never raised
/// out of navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CursorError {
    /// Transient connectivity failure. Retried on the next move.
    #[error("offline")]
    Offline,

    /// Any other failure. Permanent for this session.
    #[error("cursor error: {0}")]
    Other(String),
}

impl CursorError {
    /// Whether a probe that failed this way should be retried later.
    ///
    /// Only `Offline` qualifies.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Offline)
    }
}
