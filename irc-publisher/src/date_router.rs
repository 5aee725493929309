//! Maps an incoming spool entry's timestamp to a repo log path, compares
//! it against the `now` symlink, and triggers day rollover when the
//! incoming date is strictly later (spec section 4.5).

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike};
use irclog_format::{decode, encode, parse_timestamp_prefix, Date};

use crate::error::Result;
use crate::git::GitOperator;
use crate::rollover::roll_over;

/// Bounded read: only the leading timestamp line is needed.
const TIMESTAMP_PREFIX_BYTES: usize = 8192;

fn read_timestamp_prefix(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = fs::File::open(path)?;
    let mut buf = vec![0u8; TIMESTAMP_PREFIX_BYTES];
    let n = file.read(&mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

fn timestamp_to_date(timestamp: u64) -> Result<Date> {
    let dt = DateTime::from_timestamp(timestamp as i64, 0)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).expect("epoch is representable"));
    let date = Date::new(dt.year() as u32, dt.month() as u8, dt.day() as u8)?;
    // Integrity check: encode/decode must round-trip (spec 4.5, 8.4).
    let round_tripped = decode(&encode(date))?;
    debug_assert_eq!(round_tripped, date);
    Ok(round_tripped)
}

/// Read the `now` symlink's target, initializing it to `default` if the
/// link doesn't exist yet.
fn read_or_init_now_link(repo: &Path, default: &str) -> std::io::Result<String> {
    let now_path = repo.join("now");
    match fs::read_link(&now_path) {
        Ok(target) => Ok(target.to_string_lossy().into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            write_now_link(repo, default)?;
            Ok(default.to_string())
        }
        Err(e) => Err(e),
    }
}

fn write_now_link(repo: &Path, target: &str) -> std::io::Result<()> {
    let now_path = repo.join("now");
    if fs::symlink_metadata(&now_path).is_ok() {
        fs::remove_file(&now_path)?;
    }
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, &now_path)?;
    #[cfg(not(unix))]
    fs::write(&now_path, target)?;
    Ok(())
}

/// Append `spool_contents` (already read into memory by the caller) to
/// `target`, creating the containing `YYYY/` directory if needed. The
/// appended payload is the raw spool contents followed by a blank line
/// (spec section 4.5).
fn append_spool_contents(repo: &Path, target: &str, spool_contents: &[u8]) -> std::io::Result<()> {
    let full_path = repo.join(target);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)?;
    }
    use std::io::Write;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&full_path)?;
    file.write_all(spool_contents)?;
    file.write_all(b"\n\n")?;
    Ok(())
}

/// Route one drained spool file into the repo, rolling over the day if
/// the incoming message's date is strictly after the day `now` currently
/// points at.
///
/// `spool_path` is the already-opened-for-reading spool entry; its full
/// contents (not just the timestamp prefix) are appended to the target
/// log file.
pub fn route_and_append(
    git: &dyn GitOperator,
    repo: &Path,
    spool_path: &Path,
) -> Result<()> {
    let prefix = read_timestamp_prefix(spool_path)?;
    let timestamp = parse_timestamp_prefix(&prefix)?;
    let incoming_date = timestamp_to_date(timestamp)?;
    let incoming_name = encode(incoming_date);

    let now_target = read_or_init_now_link(repo, &incoming_name)?;
    let spool_contents = fs::read(spool_path)?;

    if now_target == incoming_name {
        append_spool_contents(repo, &now_target, &spool_contents)?;
        return Ok(());
    }

    let now_date = decode(&now_target)?;
    if incoming_date > now_date {
        tracing::info!(old = %now_target, new = %incoming_name, "day rollover");
        roll_over(git, repo, &now_target)?;
        write_now_link(repo, &incoming_name)?;
        append_spool_contents(repo, &incoming_name, &spool_contents)?;
    } else {
        // Past or equal-day-with-different-string: ordering dominates
        // timestamp fidelity (spec section 4.5).
        append_spool_contents(repo, &now_target, &spool_contents)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeGitOperator;
    use irclog_format::format_entry;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_spool_entry(dir: &Path, name: &str, timestamp: u64, sender: &str, body: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format_entry(timestamp, sender, body)).unwrap();
        path
    }

    #[test]
    fn first_message_creates_now_and_appends() {
        let repo = TempDir::new().unwrap();
        let spool = TempDir::new().unwrap();
        let entry = write_spool_entry(spool.path(), "0", 1622782862, "fred", b"hello there");

        let git = FakeGitOperator::new();
        route_and_append(&git, repo.path(), &entry).unwrap();

        let contents = fs::read_to_string(repo.path().join("2021/06-04.txt")).unwrap();
        assert_eq!(contents, "1622782862\nfred\nhello there\n\n");

        let now = fs::read_link(repo.path().join("now")).unwrap();
        assert_eq!(now.to_string_lossy(), "2021/06-04.txt");
    }

    #[test]
    fn same_day_appends_without_rollover() {
        let repo = TempDir::new().unwrap();
        let spool = TempDir::new().unwrap();
        let git = FakeGitOperator::new();

        let e0 = write_spool_entry(spool.path(), "0", 1622782862, "fred", b"hello there");
        route_and_append(&git, repo.path(), &e0).unwrap();

        let e1 = write_spool_entry(spool.path(), "1", 1622786462, "fred", b"second message");
        route_and_append(&git, repo.path(), &e1).unwrap();

        let contents = fs::read_to_string(repo.path().join("2021/06-04.txt")).unwrap();
        assert_eq!(
            contents,
            "1622782862\nfred\nhello there\n\n1622786462\nfred\nsecond message\n\n"
        );
        assert!(git.calls.borrow().is_empty());
    }

    #[test]
    fn future_day_triggers_rollover_and_repoints_now() {
        let repo = TempDir::new().unwrap();
        let spool = TempDir::new().unwrap();
        let git = FakeGitOperator::new();
        git.stub(&["rev-parse", "HEAD"], "");
        git.stub(&["status", "--porcelain"], "");

        let e0 = write_spool_entry(spool.path(), "0", 1622782862, "fred", b"hello there");
        route_and_append(&git, repo.path(), &e0).unwrap();

        // 2049-12-13 12:00:00 UTC
        let e2 = write_spool_entry(spool.path(), "2", 2523009600, "fred", b"far future");
        route_and_append(&git, repo.path(), &e2).unwrap();

        let now = fs::read_link(repo.path().join("now")).unwrap();
        assert_eq!(now.to_string_lossy(), "2049/12-13.txt");
        assert!(repo.path().join("2021/06-04.txt").exists());
        assert!(repo.path().join("2049/12-13.txt").exists());
    }

    #[test]
    fn past_timestamp_is_tolerated_and_appends_to_current_now() {
        let repo = TempDir::new().unwrap();
        let spool = TempDir::new().unwrap();
        let git = FakeGitOperator::new();

        let e0 = write_spool_entry(spool.path(), "0", 1622782862, "fred", b"hello there");
        route_and_append(&git, repo.path(), &e0).unwrap();

        // timestamp 10 => 1970-01-01, strictly before now's 2021-06-04.
        let e5 = write_spool_entry(spool.path(), "5", 10, "fred", b"time traveler");
        route_and_append(&git, repo.path(), &e5).unwrap();

        let now = fs::read_link(repo.path().join("now")).unwrap();
        assert_eq!(now.to_string_lossy(), "2021/06-04.txt");
        let contents = fs::read_to_string(repo.path().join("2021/06-04.txt")).unwrap();
        assert!(contents.ends_with("10\nfred\ntime traveler\n\n"));
        assert!(git.calls.borrow().is_empty());
    }
}
