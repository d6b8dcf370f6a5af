//! Three-slot window over an ordered mailbox.
//!
//! The window holds the item being displayed plus its two neighbors. Moving
//! shifts the window by one slot; the vacated far slot is refilled by the
//! caller from the page source.
//!
//! A neighbor slot is `None` when it has not been fetched yet or when its
//! last probe failed transiently. `Some(End)` means the mailbox has nothing
//! further in that direction, and it stays that way: an `End` neighbor is
//! never probed again.

use mailcursor_types::{Anchor, CursorResult};

/// Direction of travel through the mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards older items (the `next` slot).
    Forward,
    /// Towards newer items (the `previous` slot).
    Backward,
}

impl Direction {
    /// The other direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// What a move in one direction has to do, given the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Already sitting on `End` with `End` ahead. No change, no source calls.
    Stay,
    /// The slot ahead is `End`: shift into it without touching the source.
    ///
    /// A single move towards `End` makes `End` the current item, with the
    /// last real item behind it. Only the source position stays where it
    /// was: no advance, no probe.
    ShiftIntoEnd,
    /// Current is an `End` reached from the other direction: shift back onto
    /// the last real item without moving the source, then refill the slot
    /// ahead.
    StepOffEnd,
    /// The slot ahead is unloaded: fetch it before deciding.
    Refetch,
    /// The slot ahead is loaded: shift, advance the source, refill.
    ShiftAndAdvance,
}

/// The previous / current / next slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorWindow {
    /// The item before current, if loaded.
    pub previous: Option<CursorResult>,
    /// The item being displayed.
    pub current: CursorResult,
    /// The item after current, if loaded.
    pub next: Option<CursorResult>,
}

impl CursorWindow {
    /// A window sitting on `anchor` with both neighbors unloaded.
    pub fn new(anchor: Anchor) -> Self {
        Self {
            previous: None,
            current: anchor.into(),
            next: None,
        }
    }

    /// The neighbor slot in the direction of travel.
    pub fn ahead(&self, direction: Direction) -> Option<&CursorResult> {
        match direction {
            Direction::Forward => self.next.as_ref(),
            Direction::Backward => self.previous.as_ref(),
        }
    }

    /// The neighbor slot opposite the direction of travel.
    pub fn behind(&self, direction: Direction) -> Option<&CursorResult> {
        self.ahead(direction.opposite())
    }

    /// Overwrite the neighbor slot in the direction of travel.
    pub fn set_ahead(&mut self, direction: Direction, value: Option<CursorResult>) {
        *self.ahead_mut(direction) = value;
    }

    /// Decide what a move in `direction` must do.
    pub fn plan(&self, direction: Direction) -> Step {
        let on_end = self.current.is_end();
        match self.ahead(direction) {
            Some(CursorResult::End) if on_end => Step::Stay,
            Some(CursorResult::End) => Step::ShiftIntoEnd,
            Some(_) if on_end => Step::StepOffEnd,
            // Every shift onto End loads the slot it arrived from, and that
            // slot is never re-probed while current is End.
            None if on_end => Step::Stay,
            None => Step::Refetch,
            Some(_) => Step::ShiftAndAdvance,
        }
    }

    /// Shift the window one slot in `direction`.
    ///
    /// The slot ahead becomes current and current moves behind. The slot
    /// ahead is left unloaded unless the new current is `End`, in which case
    /// it stays `End`. Returns `false`, leaving the window untouched, when
    /// the slot ahead is unloaded.
    pub fn shift(&mut self, direction: Direction) -> bool {
        let Some(incoming) = self.ahead_mut(direction).take() else {
            return false;
        };
        let sticky = incoming.is_end();
        let outgoing = std::mem::replace(&mut self.current, incoming);
        *self.ahead_mut(direction.opposite()) = Some(outgoing);
        if sticky {
            *self.ahead_mut(direction) = Some(CursorResult::End);
        }
        true
    }

    fn ahead_mut(&mut self, direction: Direction) -> &mut Option<CursorResult> {
        match direction {
            Direction::Forward => &mut self.next,
            Direction::Backward => &mut self.previous,
        }
    }
}
