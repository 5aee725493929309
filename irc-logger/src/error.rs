//! Fatal and non-fatal error conditions for the logger process.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, Error)]
pub enum LoggerError {
    /// NickServ rejected our identify password.
    #[error("invalid password")]
    InvalidPassword,
    /// The server sent numeric 477 (cannot join channel).
    #[error("cannot join channel")]
    CannotJoinChannel,
    /// We were put into a channel other than the one we asked to join.
    #[error("joined wrong channel: expected {expected}, got {actual}")]
    JoinedWrongChannel { expected: String, actual: String },
    /// We PINGed the server and got no PONG before giving up.
    #[error("no ping response from server")]
    NoPingResponse,
    /// A line exceeded the parser's representable length.
    #[error("message too big ({0} bytes)")]
    MsgTooBig(usize),
    /// A line failed to parse as a well-formed IRC message.
    #[error("invalid message: {0}")]
    InvalidMsg(#[from] irc_proto::ParseError),
    /// A spool filename failed strict decoding during startup recovery.
    #[error(transparent)]
    Format(#[from] irclog_format::FormatError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),
    #[error("TLS handshake error: {0}")]
    TlsHandshake(#[from] native_tls::HandshakeError<std::net::TcpStream>),
}
