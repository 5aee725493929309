//! The logger's IRC protocol state machine: connection setup, NICK
//! collision recovery, NOTICE/PING/PONG handling, channel join, and
//! message capture. This module knows nothing about sockets or
//! schedulers — it consumes parsed messages and timeouts, and produces
//! [`Action`]s for the caller to execute.

use irc_proto::{Command, ParsedMessage};
use irclog_format::UNKNOWN_SENDER;

use crate::error::{LoggerError, Result};

/// Every successful read resets the silence timer; a PING is sent after
/// this many seconds of silence.
pub const MAX_SILENCE_SECONDS: u64 = 60;
/// After sending a liveness PING, give the server this long to PONG back.
pub const PONG_RESPONSE_TIMEOUT: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    Joined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingState {
    Normal { silence_deadline: u64 },
    Sent { giveup_deadline: u64 },
}

/// Something the caller must do in response to processing a message or a
/// timeout: send a raw line to the server, or spool a captured channel
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A raw line to send, without the trailing `\r\n`.
    Send(String),
    /// A channel message to hand to the spool writer.
    Spool {
        timestamp: u64,
        sender: String,
        body: Vec<u8>,
    },
}

pub struct LoggerState {
    pub stage: Stage,
    user_base: String,
    nick_suffix_counter: u16,
    channel: String,
    login_password: Option<String>,
    ping_state: PingState,
}

impl LoggerState {
    pub fn new(user_base: String, channel: String, login_password: Option<String>, now: u64) -> Self {
        LoggerState {
            stage: Stage::Setup,
            user_base,
            nick_suffix_counter: 0,
            channel,
            login_password,
            ping_state: PingState::Normal {
                silence_deadline: now + MAX_SILENCE_SECONDS,
            },
        }
    }

    pub fn ping_state(&self) -> PingState {
        self.ping_state
    }

    /// The initial handshake: NICK + USER with the base name.
    pub fn initial_handshake(&self) -> Vec<Action> {
        vec![
            Action::Send(format!("NICK {}", self.user_base)),
            Action::Send(format!("USER {} * * :{}", self.user_base, self.user_base)),
        ]
    }

    /// Call on every successful socket read, regardless of what (if
    /// anything) was parsed from it — this resets the silence timer.
    pub fn on_read(&mut self, now: u64) {
        self.ping_state = PingState::Normal {
            silence_deadline: now + MAX_SILENCE_SECONDS,
        };
    }

    /// Call when the scheduler reports a timeout.
    pub fn on_timeout(&mut self, now: u64) -> Result<Vec<Action>> {
        match self.ping_state {
            PingState::Normal { silence_deadline } if now >= silence_deadline => {
                self.ping_state = PingState::Sent {
                    giveup_deadline: now + PONG_RESPONSE_TIMEOUT,
                };
                Ok(vec![Action::Send("PING server".to_string())])
            }
            PingState::Sent { giveup_deadline } if now >= giveup_deadline => {
                Err(LoggerError::NoPingResponse)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn channel_name(&self) -> String {
        format!("#{}", self.channel)
    }

    fn is_to_me(&self, target: &str) -> bool {
        target == "*" || target == "$$*" || target == self.user_base
    }

    /// Process one parsed message, returning the actions it provokes.
    pub fn on_message(
        &mut self,
        msg: &ParsedMessage,
        line: &str,
        read_time: u64,
    ) -> Result<Vec<Action>> {
        match msg.cmd {
            Command::Name { .. } => {
                let name = msg.command_name(line).unwrap_or("");
                match name {
                    "NOTICE" => self.on_notice(msg, line),
                    "PING" => Ok(vec![Action::Send(format!(
                        "PONG {}",
                        &line[msg.params_off as usize..]
                    ))]),
                    "PONG" => Ok(Vec::new()),
                    "JOIN" => self.on_join(msg, line),
                    "PRIVMSG" => self.on_privmsg(msg, line, read_time),
                    _ => Ok(Vec::new()),
                }
            }
            Command::Numeric(376) => {
                if let Some(password) = &self.login_password {
                    Ok(vec![Action::Send(format!(
                        "PRIVMSG NickServ :identify {password}"
                    ))])
                } else {
                    Ok(vec![Action::Send(format!("JOIN {}", self.channel_name()))])
                }
            }
            Command::Numeric(433) => {
                self.nick_suffix_counter = self.nick_suffix_counter.wrapping_add(1);
                tracing::warn!(attempt = self.nick_suffix_counter, "nick collision, retrying");
                let nick = format!("{}{}", self.user_base, self.nick_suffix_counter);
                Ok(vec![
                    Action::Send(format!("NICK {nick}")),
                    Action::Send(format!("USER {nick} * * :{nick}")),
                ])
            }
            Command::Numeric(477) => Err(LoggerError::CannotJoinChannel),
            Command::Numeric(_) => Ok(Vec::new()),
        }
    }

    fn on_notice(&mut self, msg: &ParsedMessage, line: &str) -> Result<Vec<Action>> {
        let mut params = msg.params(line);
        let target = params.next().unwrap_or("");
        if !self.is_to_me(target) {
            return Ok(Vec::new());
        }
        let text = params.next().unwrap_or("");
        if text.starts_with("*** No Ident response") {
            Ok(self.initial_handshake())
        } else if text.starts_with("You are now identified for ") {
            Ok(vec![Action::Send(format!("JOIN {}", self.channel_name()))])
        } else if text.starts_with("Invalid password for ") {
            Err(LoggerError::InvalidPassword)
        } else {
            Ok(Vec::new())
        }
    }

    fn on_join(&mut self, msg: &ParsedMessage, line: &str) -> Result<Vec<Action>> {
        let joined = msg.params(line).next().unwrap_or("");
        let expected = self.channel_name();
        if joined == expected {
            self.stage = Stage::Joined;
            tracing::info!(stage = ?self.stage, "state transition");
            Ok(Vec::new())
        } else {
            Err(LoggerError::JoinedWrongChannel {
                expected,
                actual: joined.to_string(),
            })
        }
    }

    fn on_privmsg(&mut self, msg: &ParsedMessage, line: &str, read_time: u64) -> Result<Vec<Action>> {
        let mut params = msg.params(line);
        let target = params.next().unwrap_or("");
        if target != self.channel_name() {
            return Ok(Vec::new());
        }
        let body = params.next().unwrap_or("").as_bytes().to_vec();
        let sender = msg
            .prefix(line)
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string());
        Ok(vec![Action::Spool {
            timestamp: read_time,
            sender,
            body,
        }])
    }
}
