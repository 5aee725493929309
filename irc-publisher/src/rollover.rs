//! The branch-rewrite engine: folds a run of "live update" commits on top
//! of the last master commit into a single per-day commit, keeping `live`
//! force-pushed for latency and `master` fast-forwarded for durability.

use std::path::Path;

use crate::error::Result;
use crate::git::{capture_text, GitOperator};
use crate::repo_state::{check_invariant, RepoFileStatus};

const LIVE_UPDATE_MESSAGE: &str = "live update";

/// Walk `base` back past every ancestor whose commit message is exactly
/// `"live update"`, stopping at the first commit that isn't one (i.e. the
/// last closed-day commit on `master`, or the repo root).
fn walk_past_live_updates(git: &dyn GitOperator, repo: &Path, mut base: String) -> Result<String> {
    loop {
        let message = capture_text(git, repo, &["show", "-s", "--format=%B", &base])?;
        if message != LIVE_UPDATE_MESSAGE {
            return Ok(base);
        }
        base = capture_text(git, repo, &["rev-parse", &format!("{base}^")])?;
    }
}

/// Close out `old_now_target`, the day the previous `now` symlink pointed
/// at, folding any pending live-update commits into a single commit on
/// `master` if that day's file actually changed.
///
/// Spec section 4.7, steps 1-7. The caller (the date router) performs step
/// 8: creating the new `now` link and appending the incoming message.
pub fn roll_over(git: &dyn GitOperator, repo: &Path, old_now_target: &str) -> Result<()> {
    let head = capture_text(git, repo, &["rev-parse", "HEAD"])?;
    let base = walk_past_live_updates(git, repo, head)?;

    git.run(repo, &["reset", "--soft", &base])?;

    let (now_status, day_status) = check_invariant(git, repo, old_now_target)?;

    if now_status == RepoFileStatus::Tracked {
        git.run(repo, &["rm", "--cached", "now"])?;
    }

    if day_status != RepoFileStatus::Missing {
        git.run(repo, &["add", old_now_target])?;
        git.run(repo, &["commit", "-m", old_now_target])?;
        git.run(repo, &["push", "origin", "HEAD:master"])?;
    }

    if now_status != RepoFileStatus::Missing {
        let now_path = repo.join("now");
        if now_path.symlink_metadata().is_ok() {
            std::fs::remove_file(&now_path)?;
        }
    }

    Ok(())
}

/// Commit and force-push everything staged by the most recent drain onto
/// `live`. Invoked once per drain that actually published something (spec
/// section 4.7, "Live-update publication").
pub fn publish_live_update(git: &dyn GitOperator, repo: &Path) -> Result<()> {
    git.run(repo, &["add", "."])?;
    git.run(repo, &["commit", "-m", LIVE_UPDATE_MESSAGE])?;
    git.run(repo, &["push", "origin", "HEAD:live", "-f"])?;
    Ok(())
}
