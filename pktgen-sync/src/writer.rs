//! Transactional writer.
//!
//! ## Protocol
//!
//! 1. `stage` every target: write `<target>.pktgen.tmp`. A failure deletes all
//!    staged copies and nothing is committed.
//! 2. `commit`: per target, compare SHA-256 digests. Identical content is
//!    discarded without touching the target (mtime preserved).
//! 3. Otherwise move the original to `<target>.pktgen.bak` and rename the
//!    staged copy into place.
//! 4. On the first failure restore every committed target from its backup
//!    (or remove it if it was new) and delete the remaining staged copies.
//! 5. On success remove the backups.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

pub const STAGING_SUFFIX: &str = ".pktgen.tmp";
pub const BACKUP_SUFFIX: &str = ".pktgen.bak";

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped; content matches what is already on disk.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn staging_path(target: &Path) -> PathBuf {
    with_suffix(target, STAGING_SUFFIX)
}

pub fn backup_path(target: &Path) -> PathBuf {
    with_suffix(target, BACKUP_SUFFIX)
}

/// Hex SHA-256 of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Digest of the file at `path`, `None` if it does not exist.
pub(crate) fn file_digest(path: &Path) -> std::io::Result<Option<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(digest(&bytes))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn write_with_parents(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
}

/// Write `bytes` to `<path>.pktgen.tmp` and rename it over `path`. Used for
/// single files outside a [`Transaction`] (scaffolds, published copies).
pub(crate) fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
    let tmp = staging_path(path);
    write_with_parents(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Staged {
    target: PathBuf,
    staged: PathBuf,
    digest: String,
}

#[derive(Debug)]
struct Committed {
    target: PathBuf,
    backup: Option<PathBuf>,
}

enum Outcome {
    Unchanged,
    Replaced(Option<PathBuf>),
}

/// A set of target files replaced all together or not at all.
///
/// Dropping a transaction without committing deletes its staged copies.
#[derive(Debug)]
pub struct Transaction {
    dry_run: bool,
    staged: Vec<Staged>,
    planned: Vec<WriteResult>,
}

impl Transaction {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            staged: Vec::new(),
            planned: Vec::new(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Stage `content` for `target`. Dry runs only compare digests.
    pub fn stage(&mut self, target: &Path, content: &str) -> Result<(), SyncError> {
        let digest = digest(content.as_bytes());

        if self.dry_run {
            let current = file_digest(target).map_err(|e| io_err(target, e))?;
            let result = if current.as_deref() == Some(digest.as_str()) {
                tracing::debug!("unchanged: {}", target.display());
                WriteResult::Unchanged {
                    path: target.to_path_buf(),
                }
            } else {
                tracing::info!("[dry-run] would write: {}", target.display());
                WriteResult::WouldWrite {
                    path: target.to_path_buf(),
                }
            };
            self.planned.push(result);
            return Ok(());
        }

        let staged = staging_path(target);
        if let Err(source) = write_with_parents(&staged, content.as_bytes()) {
            // the failed copy may exist partially
            let _ = std::fs::remove_file(&staged);
            self.rollback();
            return Err(SyncError::StagingIo {
                path: staged,
                source,
            });
        }
        tracing::debug!("staged {} ({digest})", staged.display());
        self.staged.push(Staged {
            target: target.to_path_buf(),
            staged,
            digest,
        });
        Ok(())
    }

    /// Delete every staged copy.
    pub fn rollback(&mut self) {
        if !self.staged.is_empty() {
            tracing::warn!("discarding {} staged file(s)", self.staged.len());
        }
        for entry in self.staged.drain(..) {
            if let Err(e) = std::fs::remove_file(&entry.staged) {
                tracing::warn!("could not remove {}: {e}", entry.staged.display());
            }
        }
    }

    /// Swap every staged copy into place. Results are in staging order.
    pub fn commit(mut self) -> Result<Vec<WriteResult>, SyncError> {
        if self.dry_run {
            return Ok(std::mem::take(&mut self.planned));
        }

        let staged = std::mem::take(&mut self.staged);
        let mut results = Vec::with_capacity(staged.len());
        let mut committed: Vec<Committed> = Vec::new();

        for (index, entry) in staged.iter().enumerate() {
            match commit_one(entry) {
                Ok(Outcome::Unchanged) => {
                    tracing::debug!("unchanged: {}", entry.target.display());
                    results.push(WriteResult::Unchanged {
                        path: entry.target.clone(),
                    });
                }
                Ok(Outcome::Replaced(backup)) => {
                    committed.push(Committed {
                        target: entry.target.clone(),
                        backup,
                    });
                    results.push(WriteResult::Written {
                        path: entry.target.clone(),
                    });
                }
                Err(source) => {
                    tracing::warn!(
                        "commit failed at {}: {source}; rolling back {} file(s)",
                        entry.target.display(),
                        committed.len()
                    );
                    restore(&committed);
                    for rest in &staged[index..] {
                        let _ = std::fs::remove_file(&rest.staged);
                    }
                    return Err(SyncError::CommitIo {
                        path: entry.target.clone(),
                        source,
                    });
                }
            }
        }

        for entry in committed {
            tracing::info!("wrote: {}", entry.target.display());
            if let Some(backup) = entry.backup {
                if let Err(e) = std::fs::remove_file(&backup) {
                    tracing::warn!("could not remove backup {}: {e}", backup.display());
                }
            }
        }
        Ok(results)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        self.rollback();
    }
}

fn commit_one(entry: &Staged) -> std::io::Result<Outcome> {
    if file_digest(&entry.target)?.as_deref() == Some(entry.digest.as_str()) {
        std::fs::remove_file(&entry.staged)?;
        return Ok(Outcome::Unchanged);
    }

    let backup = if entry.target.exists() {
        let backup = backup_path(&entry.target);
        std::fs::rename(&entry.target, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = std::fs::rename(&entry.staged, &entry.target) {
        if let Some(backup) = &backup {
            let _ = std::fs::rename(backup, &entry.target);
        }
        let _ = std::fs::remove_file(&entry.staged);
        return Err(e);
    }
    Ok(Outcome::Replaced(backup))
}

fn restore(committed: &[Committed]) {
    for entry in committed.iter().rev() {
        let result = match &entry.backup {
            Some(backup) => std::fs::rename(backup, &entry.target),
            None => std::fs::remove_file(&entry.target),
        };
        if let Err(e) = result {
            tracing::warn!("could not restore {}: {e}", entry.target.display());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn commit_all(files: &[(&Path, &str)]) -> Vec<WriteResult> {
        let mut tx = Transaction::new(false);
        for (path, content) in files {
            tx.stage(path, content).unwrap();
        }
        tx.commit().unwrap()
    }

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Protocol.h");
        let results = commit_all(&[(&path, "hello")]);
        assert!(matches!(results[0], WriteResult::Written { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn identical_content_is_unchanged_and_staging_removed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Protocol.h");
        fs::write(&path, "same").unwrap();

        let results = commit_all(&[(&path, "same")]);
        assert!(matches!(results[0], WriteResult::Unchanged { .. }));
        assert!(!staging_path(&path).exists());
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn changed_content_leaves_no_side_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Protocol.h");
        fs::write(&path, "v1").unwrap();

        let results = commit_all(&[(&path, "v2")]);
        assert!(matches!(results[0], WriteResult::Written { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");
        assert!(!staging_path(&path).exists());
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn dry_run_does_not_write_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.h");
        let mut tx = Transaction::new(true);
        tx.stage(&path, "content").unwrap();
        let results = tx.commit().unwrap();
        assert!(matches!(results[0], WriteResult::WouldWrite { .. }));
        assert!(!path.exists(), "dry-run must not create files");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn staging_failure_discards_earlier_copies() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.h");
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "plain file").unwrap();
        let bad = blocker.join("bad.h");

        let mut tx = Transaction::new(false);
        tx.stage(&good, "ok").unwrap();
        assert!(staging_path(&good).exists());

        let err = tx.stage(&bad, "nope").unwrap_err();
        assert!(matches!(err, SyncError::StagingIo { .. }), "got: {err}");
        assert!(!staging_path(&good).exists());
        assert!(!good.exists());
    }

    #[test]
    fn commit_failure_restores_committed_targets() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first.h");
        let second = tmp.path().join("second.h");
        fs::write(&first, "first original").unwrap();
        fs::write(&second, "second original").unwrap();
        let fresh = tmp.path().join("fresh.h");

        let mut tx = Transaction::new(false);
        tx.stage(&first, "first new").unwrap();
        tx.stage(&fresh, "fresh new").unwrap();
        tx.stage(&second, "second new").unwrap();
        // Pull the staged copy out from under the last target.
        fs::remove_file(staging_path(&second)).unwrap();

        let err = tx.commit().unwrap_err();
        assert!(matches!(err, SyncError::CommitIo { ref path, .. } if path == &second));

        assert_eq!(fs::read_to_string(&first).unwrap(), "first original");
        assert_eq!(fs::read_to_string(&second).unwrap(), "second original");
        assert!(!fresh.exists());
        for path in [&first, &second, &fresh] {
            assert!(!staging_path(path).exists());
            assert!(!backup_path(path).exists());
        }
    }

    #[test]
    fn dropped_transaction_cleans_staging() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("x.h");
        {
            let mut tx = Transaction::new(false);
            tx.stage(&path, "x").unwrap();
        }
        assert!(!staging_path(&path).exists());
        assert!(!path.exists());
    }

    #[test]
    fn replace_file_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("client").join("Protocol.h");
        replace_file(&path, b"data").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert!(!staging_path(&path).exists());
    }
}
