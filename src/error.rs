//! Error taxonomy for the sync engine. The CLI wraps these in `anyhow` with context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by path resolution, copying, diffing and the store index.
#[derive(Debug, Error)]
pub enum GartError {
    /// Home directory lookup or path expansion failed.
    #[error("cannot resolve {path}: {reason}")]
    Resolution { path: String, reason: String },

    /// I/O failure while copying. `path` is the first entry that failed; `failed` counts all failures in that copy.
    #[error("copy failed at {path} ({failed} failed entries): {source}")]
    Copy {
        path: PathBuf,
        failed: usize,
        #[source]
        source: io::Error,
    },

    /// I/O failure while walking or reading either side of a comparison.
    #[error("diff failed at {path}: {source}")]
    Diff {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source and store would overlap (one inside the other).
    #[error("{source_path} overlaps the store at {store_root}")]
    SelfReference {
        source_path: PathBuf,
        store_root: PathBuf,
    },

    /// No dotfile registered under this name.
    #[error("dotfile '{0}' not found")]
    NotFound(String),

    /// Bulk registration finished with at least one failed entry.
    #[error("{failed} of {total} directories failed to copy")]
    Bulk { failed: usize, total: usize },

    /// Config file could not be read, parsed or written.
    #[error("config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Work stopped by the cancel flag or the deadline.
    #[error("operation cancelled")]
    Cancelled,
}

impl GartError {
    pub fn resolution(path: impl Into<String>, reason: impl Into<String>) -> Self {
        GartError::Resolution {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn diff(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GartError::Diff {
            path: path.into(),
            source,
        }
    }

    /// Single-entry copy failure.
    pub fn copy(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GartError::Copy {
            path: path.into(),
            failed: 1,
            source,
        }
    }
}

pub type GartResult<T> = std::result::Result<T, GartError>;
