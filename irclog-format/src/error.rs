//! Error types for the spool and date-log file formats.

use thiserror::Error;

/// Result type alias for format operations.
pub type Result<T> = std::result::Result<T, FormatError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A spool entry is missing the `\n` after its timestamp or sender
    /// line.
    #[error("spool entry has no newline where one was expected")]
    FileHasNoNewline,
    /// The leading line of a spool entry did not parse as a `u64`
    /// epoch-seconds timestamp.
    #[error("spool entry has an invalid timestamp")]
    FileHasInvalidTimestamp,
    /// A repo log filename (`YYYY/MM-DD.txt`) failed strict decoding.
    #[error("{0}")]
    InvalidRepoDateFilename(String),
    /// A spool directory entry's filename is not a bare decimal sequence
    /// number.
    #[error("invalid filename in out dir: '{0}'")]
    InvalidFilenameInOutDir(String),
}
