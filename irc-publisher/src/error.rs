//! Fatal and non-fatal error conditions for the publisher process.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PublisherError>;

#[derive(Debug, Error)]
pub enum PublisherError {
    /// A spool entry's timestamp didn't parse, or a repo date-log
    /// filename failed strict decoding.
    #[error(transparent)]
    Format(#[from] irclog_format::FormatError),
    /// `git status --porcelain` mentioned a file other than `now` or the
    /// day being closed.
    #[error("unexpected repo state: unrecognized file '{0}' in git status")]
    UnexpectedRepoState(String),
    /// A spool entry went missing at the endpoint of a drain range
    /// (rather than tolerated interior gap).
    #[error("spool entry {0} missing at the boundary of a drain range")]
    MissingBoundarySpoolEntry(u32),
    /// A `git` invocation exited non-zero.
    #[error("git {args:?} failed (status {status:?}): {stderr}")]
    ChildProcessFailed {
        args: Vec<String>,
        status: Option<i32>,
        stderr: String,
    },
    /// A filesystem notification didn't match the registered watch, or
    /// wasn't a "moved into" event.
    #[error("unexpected filesystem notification: {0}")]
    UnexpectedNotification(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("git output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("filesystem watch error: {0}")]
    Notify(#[from] notify::Error),
}
