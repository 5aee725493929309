//! The spool entry wire format: `<timestamp>\n<sender>\n<body>`.

use crate::error::{FormatError, Result};

/// A spool entry borrowed from its on-disk bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpoolEntry<'a> {
    pub timestamp: u64,
    pub sender: &'a str,
    pub body: &'a [u8],
}

/// Sender stored when a message arrived with no IRC prefix at all.
pub const UNKNOWN_SENDER: &str = "???";

/// Serialize one spool entry's contents (without the `.partial` dance,
/// which is the caller's job — see `irc-logger`'s spool writer).
pub fn format_entry(timestamp: u64, sender: &str, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(sender.len() + body.len() + 24);
    out.extend_from_slice(timestamp.to_string().as_bytes());
    out.push(b'\n');
    out.extend_from_slice(sender.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(body);
    out
}

/// Parse a complete spool entry's contents.
pub fn parse_entry(contents: &[u8]) -> Result<SpoolEntry<'_>> {
    let first_nl = contents
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(FormatError::FileHasNoNewline)?;
    let timestamp = parse_timestamp_line(&contents[..first_nl])?;

    let rest = &contents[first_nl + 1..];
    let second_nl = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(FormatError::FileHasNoNewline)?;
    let sender = std::str::from_utf8(&rest[..second_nl]).unwrap_or(UNKNOWN_SENDER);
    let body = &rest[second_nl + 1..];

    Ok(SpoolEntry {
        timestamp,
        sender,
        body,
    })
}

/// Parse just the leading timestamp line, given a (possibly truncated)
/// prefix of a spool entry's bytes. Used by the date router, which reads
/// only a bounded prefix of each file (spec section 4.5).
pub fn parse_timestamp_prefix(prefix: &[u8]) -> Result<u64> {
    let first_nl = prefix
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(FormatError::FileHasNoNewline)?;
    parse_timestamp_line(&prefix[..first_nl])
}

fn parse_timestamp_line(line: &[u8]) -> Result<u64> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or(FormatError::FileHasInvalidTimestamp)
}

/// Parse a spool directory entry's filename as its sequence number. Spool
/// filenames are the bare decimal ASCII of a `u32`; anything else is
/// `InvalidFilenameInOutDir`.
pub fn parse_seq_filename(name: &str) -> Result<u32> {
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = name.parse::<u32>() {
            return Ok(n);
        }
    }
    Err(FormatError::InvalidFilenameInOutDir(name.to_string()))
}

/// The `.partial` suffix used for in-progress spool writes.
pub const PARTIAL_SUFFIX: &str = ".partial";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_entry() {
        let raw = format_entry(1622782862, "fred", b"hello there");
        assert_eq!(raw, b"1622782862\nfred\nhello there");
        let parsed = parse_entry(&raw).unwrap();
        assert_eq!(parsed.timestamp, 1622782862);
        assert_eq!(parsed.sender, "fred");
        assert_eq!(parsed.body, b"hello there");
    }

    #[test]
    fn body_may_contain_newlines() {
        let raw = format_entry(1, "a", b"line1\nline2");
        let parsed = parse_entry(&raw).unwrap();
        assert_eq!(parsed.body, b"line1\nline2");
    }

    #[test]
    fn missing_newline_is_fatal() {
        assert_eq!(parse_entry(b"no newlines here"), Err(FormatError::FileHasNoNewline));
    }

    #[test]
    fn non_numeric_timestamp_is_fatal() {
        assert_eq!(
            parse_entry(b"not-a-number\nfred\nhi"),
            Err(FormatError::FileHasInvalidTimestamp)
        );
    }

    #[test]
    fn bounded_prefix_timestamp_parse() {
        let raw = format_entry(42, "fred", b"hello there, this body is irrelevant");
        assert_eq!(parse_timestamp_prefix(&raw[..8192.min(raw.len())]).unwrap(), 42);
    }

    #[test]
    fn seq_filename_parsing() {
        assert_eq!(parse_seq_filename("0").unwrap(), 0);
        assert_eq!(parse_seq_filename("42").unwrap(), 42);
        assert!(parse_seq_filename("42.partial").is_err());
        assert!(parse_seq_filename("abc").is_err());
        assert!(parse_seq_filename("").is_err());
        assert!(parse_seq_filename("-1").is_err());
    }
}
