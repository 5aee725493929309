//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "irc-publisher")]
#[command(about = "Watches a logger's spool directory and publishes it into a git repository")]
pub struct Cli {
    /// Spool directory written by a logger process.
    #[arg(long)]
    pub logger_dir: PathBuf,

    /// Git repository to publish into. Must already contain a `.git` entry.
    #[arg(long)]
    pub repo: PathBuf,

    /// Enable logging to stderr at the specified level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log: Option<tracing::Level>,
}
