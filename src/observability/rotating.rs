//! Size-capped trace file.
//!
//! When the live file grows past [`MAX_BYTES`] it is renamed to
//! `<name>.<UTC timestamp>` and a fresh file is started. Only the newest
//! [`KEEP_BACKUPS`] backups survive a rotation.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

pub const MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const KEEP_BACKUPS: usize = 3;

pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    handle: Mutex<Option<File>>,
}

impl RotatingFile {
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limit(path, MAX_BYTES)
    }

    pub const fn with_limit(path: PathBuf, max_bytes: u64) -> Self {
        Self {
            path,
            max_bytes,
            handle: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline, rotating first if the file is too big.
    pub fn append_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .handle
            .lock()
            .map_err(|e| {
                io::Error::new(io::ErrorKind::Other, format!("trace file lock poisoned: {e}"))
            })?;

        let oversized = fs::metadata(&self.path).is_ok_and(|m| m.len() > self.max_bytes);
        if oversized {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            *guard = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let file = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "trace file unavailable"))?;

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn backup_prefix(&self) -> io::Result<String> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| format!("{n}."))
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "trace path has no file name")
            })
    }

    fn rotate(&self) -> io::Result<()> {
        let prefix = self.backup_prefix()?;
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
        let mut backup = self.path.with_file_name(format!("{prefix}{stamp}"));
        let mut n = 1;
        while backup.exists() {
            backup = self.path.with_file_name(format!("{prefix}{stamp}-{n}"));
            n += 1;
        }

        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
        }
        self.prune(&prefix)
    }

    fn prune(&self, prefix: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        // timestamps sort lexicographically, newest last
        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
            })
            .collect();
        backups.sort();

        let excess = backups.len().saturating_sub(KEEP_BACKUPS);
        for stale in backups.into_iter().take(excess) {
            let _ = fs::remove_file(stale);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn backups_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| n.starts_with("trace.json."))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let file = RotatingFile::new(path.clone());

        file.append_line("{\"a\":1}").unwrap();
        file.append_line("{\"b\":2}").unwrap();

        let body = fs::read_to_string(path).unwrap();
        assert_eq!(body.lines().count(), 2);
    }

    #[test]
    fn rotates_when_over_limit_and_keeps_three_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let file = RotatingFile::with_limit(path.clone(), 8);

        for _ in 0..6 {
            file.append_line("0123456789").unwrap();
        }

        assert!(path.exists());
        let backups = backups_in(dir.path());
        assert_eq!(backups.len(), KEEP_BACKUPS);
    }
}
