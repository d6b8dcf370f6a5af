//! CLI command implementations.

pub mod browse;
pub mod session;

use mailcursor_client::{CursorError, CursorResult, CursorWindow};

/// Render one slot: `?` while unloaded, `END` past the edge, `!...` for errors.
pub fn format_slot(slot: Option<&CursorResult>) -> String {
    match slot {
        None => "?".to_string(),
        Some(CursorResult::End) => "END".to_string(),
        Some(CursorResult::Error(CursorError::Offline)) => "!offline".to_string(),
        Some(CursorResult::Error(CursorError::Other(reason))) => format!("!error({})", reason),
        Some(result) => result
            .as_anchor()
            .map(|anchor| anchor.to_string())
            .unwrap_or_default(),
    }
}

/// Render a window as `[previous] <current> [next]`.
pub fn format_window(window: &CursorWindow) -> String {
    format!(
        "[{}] <{}> [{}]",
        format_slot(window.previous.as_ref()),
        format_slot(Some(&window.current)),
        format_slot(window.next.as_ref())
    )
}
