//! Two-tier recovery policy for page probes.
//!
//! An `Offline` failure is transient: the slot is left unloaded and the probe
//! is repeated on the next move in that direction. Every other failure is
//! permanent for the session and kept in the slot as data.

use mailcursor_types::CursorResult;

/// Map a raw probe result to the value stored in a neighbor slot.
///
/// Returns `None` ("not loaded, retry due") for `Error(Offline)`.
pub fn recover(result: CursorResult) -> Option<CursorResult> {
    match result {
        CursorResult::Error(ref err) if err.is_recoverable() => None,
        other => Some(other),
    }
}

/// What to do with the result of re-fetching an unloaded neighbor slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefetchOutcome {
    /// An item or a permanent error: shift onto it and advance the source
    /// once.
    Advance(CursorResult),
    /// Nothing further that way: shift into a sticky `End`.
    IntoEnd,
    /// Still offline: leave the window as it is.
    Retry,
}

impl From<CursorResult> for RefetchOutcome {
    fn from(result: CursorResult) -> Self {
        match result {
            CursorResult::End => Self::IntoEnd,
            CursorResult::Error(ref err) if err.is_recoverable() => Self::Retry,
            other => Self::Advance(other),
        }
    }
}
