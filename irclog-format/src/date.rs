//! Encoding and strict decoding of repo log filenames: `YYYY/MM-DD.txt`.

use crate::error::{FormatError, Result};

/// A validated calendar date: year >= 1, month in 1..=12, day in 1..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    pub year: u32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: u32, month: u8, day: u8) -> Result<Self> {
        let encoded = format!("{year}/{month:02}-{day:02}.txt");
        decode(&encoded)
    }
}

/// Compose the repo-relative log path for a date: `YYYY/MM-DD.txt`.
pub fn encode(date: Date) -> String {
    format!("{}/{:02}-{:02}.txt", date.year, date.month, date.day)
}

/// Strictly decode a repo log filename back into a `Date`, validating
/// every field. Used both for the `now` symlink target and for the
/// round-trip integrity check the date router performs on every incoming
/// message (spec section 4.5).
pub fn decode(name: &str) -> Result<Date> {
    let invalid = |msg: String| FormatError::InvalidRepoDateFilename(msg);

    let body = name
        .strip_suffix(".txt")
        .ok_or_else(|| invalid(format!("filename '{name}' does not end with '.txt'")))?;

    let (year_str, rest) = body
        .split_once('/')
        .ok_or_else(|| invalid(format!("filename '{name}' is missing a '/' separator")))?;

    let (month_str, day_str) = rest
        .split_once('-')
        .ok_or_else(|| invalid(format!("filename '{name}' is missing a '-' separator")))?;

    let year: u32 = year_str
        .parse()
        .map_err(|_| invalid(format!("filename '{name}' contains an invalid year '{year_str}'")))?;
    let month: u8 = month_str
        .parse()
        .map_err(|_| invalid(format!("filename '{name}' contains an invalid month '{month_str}'")))?;
    let day: u8 = day_str
        .parse()
        .map_err(|_| invalid(format!("filename '{name}' contains an invalid day '{day_str}'")))?;

    if year < 1 {
        return Err(invalid(format!("filename '{name}' contains year {year} out of range")));
    }
    if !(1..=12).contains(&month) {
        return Err(invalid(format!("filename '{name}' contains month {month} out of range")));
    }
    if !(1..=31).contains(&day) {
        return Err(invalid(format!("filename '{name}' contains day {day} out of range")));
    }

    Ok(Date { year, month, day })
}
