//! Scans the spool directory and routes each entry into the repo in
//! ascending sequence-number order, tolerating gaps left by interrupted
//! deletes (spec section 4.4).

use std::fs;
use std::path::Path;

use irclog_format::{parse_seq_filename, PARTIAL_SUFFIX};

use crate::date_router::route_and_append;
use crate::error::{PublisherError, Result};
use crate::git::GitOperator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    Published,
    Empty,
}

/// List the spool directory, ignoring `.partial` leftovers, and find the
/// minimum and maximum numeric names in a single pass.
fn min_max_seq(spool: &Path) -> Result<Option<(u32, u32)>> {
    let mut min = None;
    let mut max = None;

    for entry in fs::read_dir(spool)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(PARTIAL_SUFFIX) {
            continue;
        }
        let seq = parse_seq_filename(&name)?;
        min = Some(min.map_or(seq, |m: u32| m.min(seq)));
        max = Some(max.map_or(seq, |m: u32| m.max(seq)));
    }

    Ok(min.zip(max))
}

/// Drain every ready spool entry into the repo, in ascending numeric
/// order. Returns `Published` if at least one entry was processed.
pub fn drain(git: &dyn GitOperator, spool: &Path, repo: &Path) -> Result<DrainOutcome> {
    let Some((min, max)) = min_max_seq(spool)? else {
        return Ok(DrainOutcome::Empty);
    };
    drain_range(git, spool, repo, min, max)
}

/// Process `min..=max` against the spool, tolerating interior gaps. Split
/// out from `drain` so tests can exercise a boundary gap directly, since
/// `min`/`max` are otherwise always present by construction (they come
/// from the same directory listing that produced them).
fn drain_range(git: &dyn GitOperator, spool: &Path, repo: &Path, min: u32, max: u32) -> Result<DrainOutcome> {
    let mut published = false;

    for seq in min..=max {
        let path = spool.join(seq.to_string());
        if !path.exists() {
            if seq == min || seq == max {
                return Err(PublisherError::MissingBoundarySpoolEntry(seq));
            }
            tracing::warn!(seq, "spool entry missing mid-range, tolerating gap");
            continue;
        }

        route_and_append(git, repo, &path)?;
        fs::remove_file(&path)?;
        tracing::info!(seq, "drained spool entry");
        published = true;
    }

    Ok(if published {
        DrainOutcome::Published
    } else {
        DrainOutcome::Empty
    })
}
