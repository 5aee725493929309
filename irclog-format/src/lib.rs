//! Shared file formats for the IRC logging/publication pipeline: the
//! spool entry wire format and the date-partitioned repo log filename
//! scheme. Both `irc-logger` (which writes spool entries) and
//! `irc-publisher` (which drains them and routes them by date) depend on
//! this crate so the two processes can never disagree about the format.

mod date;
mod error;
mod spool;

pub use date::{decode, encode, Date};
pub use error::{FormatError, Result};
pub use spool::{
    format_entry, parse_entry, parse_seq_filename, parse_timestamp_prefix, SpoolEntry,
    PARTIAL_SUFFIX, UNKNOWN_SENDER,
};
