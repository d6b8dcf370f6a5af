//! Browse a mailbox fixture with scripted moves.

use anyhow::{Context, Result};
use mailcursor_client::{Anchor, CursorError, CursorStateMachine, MailboxPageSource};
use std::path::Path;

use super::format_window;
use crate::mailbox;

/// One scripted navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// `n` or `>`
    Forward,
    /// `p` or `<`
    Backward,
    /// `i`
    InvalidatePrevious,
}

impl Move {
    fn label(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::InvalidatePrevious => "invalidate",
        }
    }
}

/// Parse a move script such as `nnp` or `>><i`.
pub fn parse_moves(script: &str) -> Result<Vec<Move>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'n' | '>' => Ok(Move::Forward),
            'p' | '<' => Ok(Move::Backward),
            'i' => Ok(Move::InvalidatePrevious),
            other => anyhow::bail!("unknown move '{}' (expected n, p or i)", other),
        })
        .collect()
}

/// Run the browse command.
pub async fn run(
    mailbox_path: &Path,
    anchor: Anchor,
    script: &str,
    offline_at: Option<usize>,
) -> Result<()> {
    let moves = parse_moves(script)?;
    let items = mailbox::load(mailbox_path).await?;
    let source = MailboxPageSource::open(items, &anchor).context("Cannot open mailbox")?;

    for line in replay(source, anchor, &moves, offline_at).await {
        println!("{}", line);
    }
    Ok(())
}

/// Open a cursor on `source` and run `moves`, one rendered line per step.
///
/// With `offline_at = Some(i)`, the probe right before move `i` fails offline.
pub async fn replay(
    source: MailboxPageSource,
    anchor: Anchor,
    moves: &[Move],
    offline_at: Option<usize>,
) -> Vec<String> {
    let cursor = CursorStateMachine::new(anchor, source);
    cursor.settled().await;

    let mut lines = vec![format!("{:<10} {}", "start", format_window(&cursor.snapshot()))];
    for (index, step) in moves.iter().enumerate() {
        if offline_at == Some(index) {
            cursor.source().fail_next_with(CursorError::Offline);
        }
        match step {
            Move::Forward => cursor.move_forward().await,
            Move::Backward => cursor.move_backward().await,
            Move::InvalidatePrevious => cursor.invalidate_previous().await,
        }
        lines.push(format!(
            "{:<10} {}",
            step.label(),
            format_window(&cursor.snapshot())
        ));
    }

    cursor.disconnect();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(anchor: &Anchor) -> MailboxPageSource {
        let items = ["50", "100", "200", "300"]
            .into_iter()
            .map(Anchor::conversation)
            .collect();
        MailboxPageSource::open(items, anchor).unwrap()
    }

    #[test]
    fn parses_move_script() {
        assert_eq!(
            parse_moves("n > p< i").unwrap(),
            vec![
                Move::Forward,
                Move::Forward,
                Move::Backward,
                Move::Backward,
                Move::InvalidatePrevious
            ]
        );
        assert!(parse_moves("nx").is_err());
    }

    #[tokio::test]
    async fn replay_walks_the_mailbox() {
        let anchor = Anchor::conversation("100");
        let moves = parse_moves("nnnp").unwrap();

        let lines = replay(source(&anchor), anchor, &moves, None).await;

        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("[50] <100> [200]"));
        assert!(lines[1].ends_with("[100] <200> [300]"));
        assert!(lines[2].ends_with("[200] <300> [END]"));
        assert!(lines[3].ends_with("[300] <END> [END]"));
        assert!(lines[4].ends_with("[200] <300> [END]"));
    }

    #[tokio::test]
    async fn offline_probe_is_recovered_on_next_move() {
        let anchor = Anchor::conversation("100");
        let moves = parse_moves("nn").unwrap();

        let lines = replay(source(&anchor), anchor, &moves, Some(0)).await;

        // The refill after the first move goes offline; the second move retries it.
        assert!(lines[1].ends_with("[100] <200> [?]"));
        assert!(lines[2].ends_with("[200] <300> [END]"));
    }
}
