//! Error types for raw IRC line parsing.

use thiserror::Error;

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Reasons a raw line fails to decompose into prefix / command / params.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Line length would not fit in the parser's 16-bit offsets.
    #[error("line too long to parse ({0} bytes, must be < 65535)")]
    TooLong(usize),
    /// A `:prefix` was started but never terminated by a space.
    #[error("missing space after message prefix")]
    MissingSpaceAfterMsgPrefix,
    /// No valid command token (3-digit numeric or letters-only name) found.
    #[error("missing or malformed command")]
    MissingCommand,
}
