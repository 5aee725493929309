//! Decomposition of a single raw IRC line into prefix / command / params.

use crate::error::{ParseError, Result};

/// Offsets and a tagged command for one parsed line. All offsets are byte
/// offsets into the original line, chosen to fit a `u16` (the parser
/// rejects any line that wouldn't).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Byte offset of the space terminating `:prefix`, or 0 if there was no
    /// prefix.
    pub prefix_limit: u16,
    /// The command token.
    pub cmd: Command,
    /// Byte offset where the parameter region begins.
    pub params_off: u16,
}

/// A command is either a 3-digit numeric reply code or a letters-only name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `start..end` span of an ASCII-letters command name.
    Name { start: u16, end: u16 },
    /// A numeric reply code in `0..=999`.
    Numeric(u16),
}

impl ParsedMessage {
    /// The prefix text (without the leading `:`), if present.
    pub fn prefix<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.prefix_limit == 0 {
            None
        } else {
            Some(&line[1..self.prefix_limit as usize])
        }
    }

    /// The command name span, if this is a name command (not numeric).
    pub fn command_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        match self.cmd {
            Command::Name { start, end } => Some(&line[start as usize..end as usize]),
            Command::Numeric(_) => None,
        }
    }

    /// An iterator over the space-separated parameters of this message.
    pub fn params<'a>(&self, line: &'a str) -> ParamIter<'a> {
        ParamIter::new(&line[self.params_off as usize..])
    }
}

const MAX_LEN: usize = 65535;

/// Parse one raw line (no trailing CRLF) into prefix / command / params
/// offsets.
pub fn parse_line(line: &str) -> Result<ParsedMessage> {
    if line.len() >= MAX_LEN {
        return Err(ParseError::TooLong(line.len()));
    }
    let bytes = line.as_bytes();

    let (prefix_limit, cmd_start) = if bytes.first() == Some(&b':') {
        match bytes[1..].iter().position(|&b| b == b' ') {
            Some(rel) => {
                let space_at = 1 + rel;
                (space_at as u16, space_at + 1)
            }
            None => return Err(ParseError::MissingSpaceAfterMsgPrefix),
        }
    } else {
        (0u16, 0usize)
    };

    let rest = &bytes[cmd_start..];
    if rest.is_empty() {
        return Err(ParseError::MissingCommand);
    }

    // Numeric: exactly three ASCII digits followed by a space.
    if rest.len() >= 4 && rest[..3].iter().all(u8::is_ascii_digit) && rest[3] == b' ' {
        let code: u16 = line[cmd_start..cmd_start + 3].parse().expect("3 ascii digits");
        let params_off = cmd_start + 4;
        return Ok(ParsedMessage {
            prefix_limit,
            cmd: Command::Numeric(code),
            params_off: params_off as u16,
        });
    }

    // Name: one or more ASCII letters, then a space or end of input.
    let letter_count = rest.iter().take_while(|b| b.is_ascii_alphabetic()).count();
    if letter_count == 0 {
        return Err(ParseError::MissingCommand);
    }
    let name_end = cmd_start + letter_count;
    let params_off = match bytes.get(name_end) {
        Some(&b' ') => name_end + 1,
        None => name_end,
        Some(_) => return Err(ParseError::MissingCommand),
    };

    Ok(ParsedMessage {
        prefix_limit,
        cmd: Command::Name {
            start: cmd_start as u16,
            end: name_end as u16,
        },
        params_off: params_off as u16,
    })
}

/// Iterator over space-separated parameters of the parameter region.
///
/// A token beginning with `:` consumes the remainder of the line verbatim
/// (the IRC "trailing" parameter) and ends iteration. Exhausted iterators
/// keep returning `None`.
pub struct ParamIter<'a> {
    rest: &'a str,
    done: bool,
}

impl<'a> ParamIter<'a> {
    pub fn new(region: &'a str) -> Self {
        ParamIter {
            rest: region,
            done: false,
        }
    }
}

impl<'a> Iterator for ParamIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }
        let s = self.rest.trim_start_matches(' ');
        if s.is_empty() {
            self.done = true;
            return None;
        }
        if let Some(trailing) = s.strip_prefix(':') {
            self.done = true;
            return Some(trailing);
        }
        match s.find(' ') {
            Some(idx) => {
                self.rest = &s[idx..];
                Some(&s[..idx])
            }
            None => {
                self.done = true;
                Some(s)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_prefixed_name_command() {
        let msg = parse_line(":foo NOTICE ").unwrap();
        assert_eq!(msg.prefix_limit, 4);
        assert_matches!(msg.cmd, Command::Name { start: 5, end: 11 });
        assert_eq!(msg.params_off, 12);
        assert_eq!(msg.prefix(":foo NOTICE "), Some("foo"));
        assert_eq!(msg.command_name(":foo NOTICE "), Some("NOTICE"));
    }

    #[test]
    fn parses_numeric_command() {
        let msg = parse_line("123 ").unwrap();
        assert_eq!(msg.prefix_limit, 0);
        assert_matches!(msg.cmd, Command::Numeric(123));
        assert_eq!(msg.params_off, 4);
    }

    #[test]
    fn name_command_with_no_trailing_params_is_ok() {
        let msg = parse_line("PING").unwrap();
        assert_matches!(msg.cmd, Command::Name { start: 0, end: 4 });
        assert_eq!(msg.params_off, 4);
        assert_eq!(msg.params("PING").next(), None);
    }

    #[test]
    fn empty_input_is_missing_command() {
        assert_matches!(parse_line(""), Err(ParseError::MissingCommand));
    }

    #[test]
    fn prefix_with_no_space_is_fatal() {
        assert_matches!(
            parse_line(":justaprefix"),
            Err(ParseError::MissingSpaceAfterMsgPrefix)
        );
    }

    #[test]
    fn prefix_then_end_is_missing_command() {
        assert_matches!(parse_line(":foo "), Err(ParseError::MissingCommand));
    }

    #[test]
    fn too_long_line_is_rejected() {
        let line = "a".repeat(65535);
        assert_matches!(parse_line(&line), Err(ParseError::TooLong(65535)));
    }

    #[test]
    fn param_iter_trailing_only() {
        let params: Vec<_> = ParamIter::new(":abc def").collect();
        assert_eq!(params, vec!["abc def"]);
    }

    #[test]
    fn param_iter_token_then_trailing() {
        let params: Vec<_> = ParamIter::new("abc :def").collect();
        assert_eq!(params, vec!["abc", "def"]);
    }

    #[test]
    fn param_iter_is_idempotent_past_end() {
        let mut iter = ParamIter::new("one two");
        assert_eq!(iter.next(), Some("one"));
        assert_eq!(iter.next(), Some("two"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn privmsg_to_me_example() {
        let line = ":nick!user@host PRIVMSG #chan :hello there";
        let msg = parse_line(line).unwrap();
        let target = msg.params(line).next().unwrap();
        assert_eq!(target, "#chan");
        let mut params = msg.params(line);
        params.next();
        assert_eq!(params.next(), Some("hello there"));
    }
}
