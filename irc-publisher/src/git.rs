//! Thin adapter over the `git` CLI, invoked as a child process. Expressed
//! behind a trait so the branch-rewrite engine can be exercised in tests
//! against an in-memory fake instead of a real checkout (see spec section
//! 8's note on the `GitOperator` test seam).

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{PublisherError, Result};

pub trait GitOperator {
    /// Run `git <args>` in `repo`, returning captured stdout. Fails on any
    /// non-zero exit.
    fn run_capture(&self, repo: &Path, args: &[&str]) -> Result<Vec<u8>>;

    /// Run `git <args>` in `repo`, logging stdout/stderr and discarding
    /// them. Fails on any non-zero exit.
    fn run(&self, repo: &Path, args: &[&str]) -> Result<()> {
        self.run_capture(repo, args).map(|_| ())
    }
}

/// Production implementation: shells out to `git` on `$PATH`.
pub struct ProcessGitOperator;

impl GitOperator for ProcessGitOperator {
    fn run_capture(&self, repo: &Path, args: &[&str]) -> Result<Vec<u8>> {
        tracing::debug!(?args, repo = %repo.display(), "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(repo)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(PublisherError::ChildProcessFailed {
                args: args.iter().map(|s| s.to_string()).collect(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if !output.stderr.is_empty() {
            tracing::debug!(stderr = %String::from_utf8_lossy(&output.stderr), "git stderr");
        }

        Ok(output.stdout)
    }
}

/// Run `git <args>` and decode stdout as trimmed UTF-8.
pub fn capture_text(git: &dyn GitOperator, repo: &Path, args: &[&str]) -> Result<String> {
    let bytes = git.run_capture(repo, args)?;
    Ok(String::from_utf8(bytes)?.trim().to_string())
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::cell::RefCell;

    /// Records every invocation; lets tests script canned responses by
    /// argv prefix.
    #[derive(Default)]
    pub struct FakeGitOperator {
        pub calls: RefCell<Vec<Vec<String>>>,
        pub responses: RefCell<Vec<(Vec<String>, Vec<u8>)>>,
    }

    impl FakeGitOperator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn stub(&self, args: &[&str], response: &str) {
            self.responses.borrow_mut().push((
                args.iter().map(|s| s.to_string()).collect(),
                response.as_bytes().to_vec(),
            ));
        }
    }

    impl GitOperator for FakeGitOperator {
        fn run_capture(&self, _repo: &Path, args: &[&str]) -> Result<Vec<u8>> {
            let argv: Vec<String> = args.iter().map(|s| s.to_string()).collect();
            self.calls.borrow_mut().push(argv.clone());
            let responses = self.responses.borrow();
            for (stub_args, response) in responses.iter() {
                if stub_args == &argv {
                    return Ok(response.clone());
                }
            }
            Ok(Vec::new())
        }
    }
}
