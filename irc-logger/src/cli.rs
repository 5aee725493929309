//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "irc-logger")]
#[command(about = "Maintains a TLS IRC connection and spools channel messages to disk")]
pub struct Cli {
    /// IRC server to connect to, as `host:port`.
    #[arg(long)]
    pub server: String,

    /// Nickname / username to register with.
    #[arg(long)]
    pub user: String,

    /// Channel to join, without the leading `#`.
    #[arg(long)]
    pub channel: String,

    /// Spool directory to write captured messages into.
    #[arg(long)]
    pub dir: PathBuf,

    /// NickServ password to identify with, if any.
    #[arg(long)]
    pub password: Option<String>,

    /// Enable logging to stderr at the specified level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log: Option<tracing::Level>,
}
