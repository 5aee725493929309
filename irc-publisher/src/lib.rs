//! Publisher: watches a logger's spool directory and continuously
//! integrates it into a date-partitioned git repository, force-pushed to
//! `live` and periodically folded into `master` as day boundaries cross.

pub mod cli;
pub mod date_router;
pub mod drainer;
pub mod error;
pub mod git;
pub mod repo_state;
pub mod rollover;
pub mod watcher;

use error::{PublisherError, Result};
use git::ProcessGitOperator;

pub use cli::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    if !cli.logger_dir.is_dir() {
        return Err(PublisherError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("--logger-dir {} is not a directory", cli.logger_dir.display()),
        )));
    }

    if !cli.repo.join(".git").exists() {
        return Err(PublisherError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("--repo {} has no .git entry", cli.repo.display()),
        )));
    }

    let git = ProcessGitOperator;
    watcher::watch(&git, &cli.logger_dir, &cli.repo)
}
