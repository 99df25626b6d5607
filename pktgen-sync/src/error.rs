//! Error types for pktgen-sync.

use std::path::PathBuf;

use thiserror::Error;

use pktgen_core::{SchemaError, ValidationReport};
use pktgen_renderer::RenderError;

use crate::region::RegionError;

/// All errors that can arise from a generation run. Every variant is fatal;
/// by the time one is returned no artifact has been left half written.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The schema loaded but broke one or more invariants. Nothing was staged.
    #[error("{0}")]
    Validation(ValidationReport),

    /// A managed artifact lacks a usable sentinel pair.
    #[error("{path}: {source}")]
    Structural {
        path: PathBuf,
        #[source]
        source: RegionError,
    },

    /// A managed artifact exists but is not UTF-8 text. Nothing was staged.
    #[error("{path} is not valid UTF-8 (first invalid byte at offset {offset}); managed artifacts must be saved as UTF-8")]
    NotUtf8 { path: PathBuf, offset: usize },

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Signature pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Writing a staged copy failed. All staged copies were removed.
    #[error("failed to stage {path}: {source}")]
    StagingIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Swapping a staged copy into place failed. Every target committed
    /// earlier in the run was restored from its backup.
    #[error("failed to commit {path}: {source}")]
    CommitIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
