//! Classification of `git status --porcelain` output against the tri-state
//! shape the publisher admits (section 3 of the repo log format).

use crate::error::{PublisherError, Result};
use crate::git::{capture_text, GitOperator};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoFileStatus {
    Missing,
    Untracked,
    Tracked,
}

/// One line of `git status --porcelain` output: an XY status code and a
/// path, relative to the repo root.
struct PorcelainEntry {
    code: String,
    path: String,
}

fn parse_porcelain(output: &str) -> Vec<PorcelainEntry> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let code = line[..2].to_string();
            let path = line[3..].to_string();
            PorcelainEntry { code, path }
        })
        .collect()
}

/// Look up `name`'s status among the parsed porcelain entries. A file not
/// mentioned at all is `Missing`; `??` is `Untracked`; anything else
/// mentioned is `Tracked`.
fn status_of(entries: &[PorcelainEntry], name: &str) -> RepoFileStatus {
    match entries.iter().find(|e| e.path == name) {
        None => RepoFileStatus::Missing,
        Some(e) if e.code == "??" => RepoFileStatus::Untracked,
        Some(_) => RepoFileStatus::Tracked,
    }
}

/// Read `git status --porcelain`, check that only `now` and `day_path` are
/// mentioned, and return their statuses. Any other filename mentioned is a
/// fatal `UnexpectedRepoState`.
pub fn check_invariant(
    git: &dyn GitOperator,
    repo: &Path,
    day_path: &str,
) -> Result<(RepoFileStatus, RepoFileStatus)> {
    let raw = capture_text(git, repo, &["status", "--porcelain"])?;
    let entries = parse_porcelain(&raw);

    for entry in &entries {
        if entry.path != "now" && entry.path != day_path {
            return Err(PublisherError::UnexpectedRepoState(entry.path.clone()));
        }
    }

    let now_status = status_of(&entries, "now");
    let day_status = status_of(&entries, day_path);
    Ok((now_status, day_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeGitOperator;
    use assert_matches::assert_matches;
    use std::path::PathBuf;

    fn repo() -> PathBuf {
        PathBuf::from("/nonexistent")
    }

    #[test]
    fn clean_repo_is_all_missing() {
        let git = FakeGitOperator::new();
        git.stub(&["status", "--porcelain"], "");
        let (now, day) = check_invariant(&git, &repo(), "2021/06-04.txt").unwrap();
        assert_eq!(now, RepoFileStatus::Missing);
        assert_eq!(day, RepoFileStatus::Missing);
    }

    #[test]
    fn untracked_now_and_present_day() {
        let git = FakeGitOperator::new();
        git.stub(
            &["status", "--porcelain"],
            "?? now\n?? 2021/06-04.txt\n",
        );
        let (now, day) = check_invariant(&git, &repo(), "2021/06-04.txt").unwrap();
        assert_eq!(now, RepoFileStatus::Untracked);
        assert_eq!(day, RepoFileStatus::Untracked);
    }

    #[test]
    fn tracked_now() {
        let git = FakeGitOperator::new();
        git.stub(&["status", "--porcelain"], "M  now\n");
        let (now, _) = check_invariant(&git, &repo(), "2021/06-04.txt").unwrap();
        assert_eq!(now, RepoFileStatus::Tracked);
    }

    #[test]
    fn unexpected_file_is_fatal() {
        let git = FakeGitOperator::new();
        git.stub(&["status", "--porcelain"], "?? garbage.txt\n");
        let err = check_invariant(&git, &repo(), "2021/06-04.txt").unwrap_err();
        assert_matches!(err, PublisherError::UnexpectedRepoState(ref f) if f == "garbage.txt");
    }
}
