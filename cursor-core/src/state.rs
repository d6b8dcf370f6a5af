//! Published state of an ephemeral cursor session.

/// What observers of a browsing session see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemeralCursorState<C> {
    /// No cursor has been published yet.
    NotInitialised,
    /// The published cursor was cleared or torn down.
    CursorDead,
    /// The live cursor.
    Data(C),
}

impl<C> EphemeralCursorState<C> {
    /// The live cursor, if any.
    pub fn cursor(&self) -> Option<&C> {
        match self {
            Self::Data(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Whether a cursor has ever been published.
    pub fn is_initialised(&self) -> bool {
        !matches!(self, Self::NotInitialised)
    }

    /// Take the live cursor out, leaving `CursorDead` behind.
    ///
    /// Leaves other states untouched and returns `None` for them.
    pub fn take(&mut self) -> Option<C> {
        match std::mem::replace(self, Self::CursorDead) {
            Self::Data(cursor) => Some(cursor),
            other => {
                *self = other;
                None
            }
        }
    }
}

impl<C> Default for EphemeralCursorState<C> {
    fn default() -> Self {
        Self::NotInitialised
    }
}
