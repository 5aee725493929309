//! Filesystem-notification-driven main loop: one drain per notification
//! batch, one live-update publication per drain that published anything
//! (spec section 4.8).

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::drainer::{drain, DrainOutcome};
use crate::error::{PublisherError, Result};
use crate::git::GitOperator;
use crate::rollover::publish_live_update;

/// Run a single drain-and-publish cycle: drain the spool into the repo,
/// and if anything was published, commit and force-push `live`.
fn drain_and_publish(git: &dyn GitOperator, spool: &Path, repo: &Path) -> Result<()> {
    if drain(git, spool, repo)? == DrainOutcome::Published {
        publish_live_update(git, repo)?;
    }
    Ok(())
}

/// Validate that a batch of filesystem events are all "moved into
/// directory" events for our spool (the logger's `.partial`-then-rename
/// publish, both halves inside the same watched directory); anything
/// else is fatal (`UnexpectedNotification`).
fn validate_batch(events: &[Event]) -> Result<()> {
    for event in events {
        if !matches!(
            event.kind,
            EventKind::Modify(ModifyKind::Name(RenameMode::Both | RenameMode::To))
        ) {
            return Err(PublisherError::UnexpectedNotification(format!(
                "{:?}",
                event.kind
            )));
        }
    }
    Ok(())
}

/// Run forever: one catch-up drain at startup, then block on filesystem
/// notifications, draining and publishing on every batch.
pub fn watch(git: &dyn GitOperator, spool: &Path, repo: &Path) -> Result<()> {
    drain_and_publish(git, spool, repo)?;

    let (tx, rx) = mpsc::channel();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })?;
    watcher.watch(spool, RecursiveMode::NonRecursive)?;

    loop {
        let mut batch = Vec::new();
        // Block for the first event in the batch, then drain whatever
        // else arrived within a short window before reacting.
        match rx.recv() {
            Ok(Ok(event)) => batch.push(event),
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Ok(()),
        }
        while let Ok(res) = rx.recv_timeout(Duration::from_millis(50)) {
            batch.push(res?);
        }

        validate_batch(&batch)?;
        drain_and_publish(git, spool, repo)?;
    }
}
