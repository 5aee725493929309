//! Crash-safe single-message spool writer, and the startup sequence-number
//! recovery scan.

use std::fs;
use std::path::{Path, PathBuf};

use irclog_format::PARTIAL_SUFFIX;

use crate::error::{LoggerError, Result};

pub struct SpoolWriter {
    dir: PathBuf,
    next_seq_num: u32,
}

impl SpoolWriter {
    /// Scan `dir`, deleting leftover `.partial` files from an interrupted
    /// previous run and computing the next sequence number to assign.
    pub fn recover(dir: PathBuf) -> Result<Self> {
        let mut max_seen: Option<u32> = None;

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if name.ends_with(PARTIAL_SUFFIX) {
                fs::remove_file(entry.path())?;
                continue;
            }

            let seq = irclog_format::parse_seq_filename(&name)?;
            max_seen = Some(max_seen.map_or(seq, |m| m.max(seq)));
        }

        let next_seq_num = max_seen.map_or(0, |m| m + 1);
        tracing::info!(next_seq_num, dir = %dir.display(), "spool recovered");
        Ok(SpoolWriter { dir, next_seq_num })
    }

    fn is_empty(&self) -> std::io::Result<bool> {
        Ok(fs::read_dir(&self.dir)?.next().is_none())
    }

    /// Write one message to the spool, returning the sequence number it
    /// was assigned.
    pub fn write(&mut self, timestamp: u64, sender: &str, body: &[u8]) -> Result<u32> {
        if self.next_seq_num != 0 && self.is_empty()? {
            tracing::debug!("spool observed empty, resetting sequence counter to 0");
            self.next_seq_num = 0;
        }

        let seq = self.next_seq_num;
        let contents = irclog_format::format_entry(timestamp, sender, body);

        let partial_path = partial_path(&self.dir, seq);
        fs::write(&partial_path, &contents)?;
        fs::rename(&partial_path, final_path(&self.dir, seq))?;

        self.next_seq_num += 1;
        tracing::debug!(seq, "wrote spool entry");
        Ok(seq)
    }
}

fn partial_path(dir: &Path, seq: u32) -> PathBuf {
    dir.join(format!("{seq}{PARTIAL_SUFFIX}"))
}

fn final_path(dir: &Path, seq: u32) -> PathBuf {
    dir.join(seq.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn recovers_empty_dir_to_zero() {
        let dir = tempdir().unwrap();
        let writer = SpoolWriter::recover(dir.path().to_path_buf()).unwrap();
        assert_eq!(writer.next_seq_num, 0);
    }

    #[test]
    fn recovers_next_seq_num_from_existing_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0"), b"x").unwrap();
        fs::write(dir.path().join("5"), b"x").unwrap();
        let writer = SpoolWriter::recover(dir.path().to_path_buf()).unwrap();
        assert_eq!(writer.next_seq_num, 6);
    }

    #[test]
    fn removes_leftover_partial_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("3.partial"), b"x").unwrap();
        SpoolWriter::recover(dir.path().to_path_buf()).unwrap();
        assert!(!dir.path().join("3.partial").exists());
    }

    #[test]
    fn non_numeric_filename_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("not-a-number"), b"x").unwrap();
        assert!(SpoolWriter::recover(dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn write_is_atomic_and_increments() {
        let dir = tempdir().unwrap();
        let mut writer = SpoolWriter::recover(dir.path().to_path_buf()).unwrap();
        let seq0 = writer.write(100, "fred", b"hi").unwrap();
        assert_eq!(seq0, 0);
        assert!(!dir.path().join("0.partial").exists());
        assert_eq!(fs::read(dir.path().join("0")).unwrap(), b"100\nfred\nhi");

        let seq1 = writer.write(101, "fred", b"again").unwrap();
        assert_eq!(seq1, 1);
    }

    #[test]
    fn resets_to_zero_once_spool_drained() {
        let dir = tempdir().unwrap();
        let mut writer = SpoolWriter::recover(dir.path().to_path_buf()).unwrap();
        writer.write(1, "a", b"x").unwrap();
        writer.write(2, "a", b"y").unwrap();
        fs::remove_file(dir.path().join("0")).unwrap();
        fs::remove_file(dir.path().join("1")).unwrap();

        let seq = writer.write(3, "a", b"z").unwrap();
        assert_eq!(seq, 0);
    }
}
