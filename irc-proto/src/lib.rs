//! Parser for a single raw IRC protocol line.
//!
//! This crate has one job: take a line with the trailing CRLF already
//! stripped and decompose it into an optional `:prefix`, a command (either
//! a 3-digit numeric reply code or a letters-only name), and the offset
//! where parameters begin. It does not know about sockets, channels, or
//! any higher-level IRC semantics — those live in `irc-logger`.

mod error;
mod message;

pub use error::{ParseError, Result};
pub use message::{parse_line, Command, ParamIter, ParsedMessage};
