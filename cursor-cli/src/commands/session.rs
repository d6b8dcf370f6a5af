//! Demonstrate the session lifecycle: publish, observe, abandon, tear down.

use anyhow::{Context, Result};
use mailcursor_client::{
    Anchor, CursorStateMachine, EphemeralCursorLifecycleManager, EphemeralCursorState,
    LifecycleConfig, MailboxPageSource, SessionState,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::format_window;
use crate::mailbox;

type MailboxCursor = CursorStateMachine<MailboxPageSource>;

/// Run the session command.
pub async fn run(mailbox_path: &Path, anchor: Anchor, config: LifecycleConfig) -> Result<()> {
    let items = mailbox::load(mailbox_path).await?;
    let source = MailboxPageSource::open(items, &anchor).context("Cannot open mailbox")?;

    for line in walk_session(source, anchor, config).await {
        println!("{}", line);
    }
    Ok(())
}

/// Publish a cursor, observe it once, drop the observer and wait out the
/// grace window. One rendered line per phase.
pub async fn walk_session(
    source: MailboxPageSource,
    anchor: Anchor,
    config: LifecycleConfig,
) -> Vec<String> {
    let grace = config.teardown_grace;
    let sessions = EphemeralCursorLifecycleManager::with_config(config);
    let mut lines = vec![format!("before publish: {}", describe(&sessions.current_state()))];

    let cursor = CursorStateMachine::new(anchor, source);
    cursor.settled().await;
    sessions.set_ephemeral_cursor(Arc::clone(&cursor));

    let mut observer = sessions.observe_cursor();
    if let Some(state) = observer.recv().await {
        lines.push(format!("observed: {}", describe(&state)));
    }
    drop(observer);
    lines.push(format!(
        "observer dropped, waiting {}ms",
        grace.as_millis()
    ));

    tokio::time::sleep(grace + Duration::from_millis(100)).await;
    lines.push(format!("after grace: {}", describe(&sessions.current_state())));
    lines.push(format!("source released: {}", cursor.source().is_disconnected()));
    lines
}

fn describe(state: &SessionState<MailboxCursor>) -> String {
    match state {
        EphemeralCursorState::NotInitialised => "not initialised".to_string(),
        EphemeralCursorState::CursorDead => "cursor dead".to_string(),
        EphemeralCursorState::Data(cursor) => format_window(&cursor.snapshot()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn session_is_torn_down_after_grace() {
        let items = ["50", "100", "200"]
            .into_iter()
            .map(Anchor::conversation)
            .collect();
        let anchor = Anchor::conversation("100");
        let source = MailboxPageSource::open(items, &anchor).unwrap();
        let config = LifecycleConfig::default().with_teardown_grace(Duration::from_millis(500));

        let lines = walk_session(source, anchor, config).await;

        assert_eq!(
            lines,
            vec![
                "before publish: not initialised".to_string(),
                "observed: [50] <100> [200]".to_string(),
                "observer dropped, waiting 500ms".to_string(),
                "after grace: cursor dead".to_string(),
                "source released: true".to_string(),
            ]
        );
    }
}
