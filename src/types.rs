//! Public and internal types for the gart API and bulk pipeline.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::error::{GartError, GartResult};

/// A registered dotfile: logical name → absolute, cleaned source path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DotfileEntry {
    pub name: String,
    pub source_path: PathBuf,
}

/// Result of comparing a live source against its stored copy. Paths are relative to the compared roots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Present in the source only.
    pub added: Vec<PathBuf>,
    /// Present in the store only.
    pub removed: Vec<PathBuf>,
    /// Present in both with different content or kind.
    pub modified: Vec<PathBuf>,
    /// The store copy did not exist and was created by this call; nothing was compared.
    pub baseline_created: bool,
}

impl DiffResult {
    pub fn changed(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty())
    }

    /// Every changed relative path, sorted.
    pub fn details(&self) -> Vec<&Path> {
        let mut all: Vec<&Path> = self
            .added
            .iter()
            .chain(&self.removed)
            .chain(&self.modified)
            .map(PathBuf::as_path)
            .collect();
        all.sort();
        all
    }

    /// Merge `other` into `self`, prefixing its paths with `prefix`.
    pub fn absorb(&mut self, prefix: &Path, other: DiffResult) {
        let join = |p: PathBuf| {
            if p.as_os_str().is_empty() {
                prefix.to_path_buf()
            } else {
                prefix.join(p)
            }
        };
        self.added.extend(other.added.into_iter().map(join));
        self.removed.extend(other.removed.into_iter().map(join));
        self.modified.extend(other.modified.into_iter().map(join));
        self.baseline_created |= other.baseline_created;
    }

    pub(crate) fn sort(&mut self) {
        self.added.sort();
        self.removed.sort();
        self.modified.sort();
    }
}

/// Counters from one copy call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub symlinks: usize,
}

/// Shared cancel signal. Set from a Ctrl+C handler or by a strict bulk run on first failure.
pub type CancelFlag = Arc<AtomicBool>;

/// Outcome of a bulk registration: one bucket per discovered hidden directory.
#[derive(Debug, Default)]
pub struct BulkReport {
    /// Source directories copied successfully, with their store destination.
    pub copied: Vec<(PathBuf, PathBuf)>,
    /// Directories rejected by the ignore filter.
    pub ignored: Vec<PathBuf>,
    /// Directories whose copy failed (possibly partially written).
    pub failed: Vec<(PathBuf, GartError)>,
    /// Directories never started because of cancellation or the deadline.
    pub cancelled: Vec<PathBuf>,
}

impl BulkReport {
    /// Number of directories handed to the worker pool.
    pub fn dispatched(&self) -> usize {
        self.copied.len() + self.failed.len() + self.cancelled.len()
    }

    /// Turn failures into an aggregate error; cancellation alone yields [`GartError::Cancelled`].
    pub fn ensure_success(&self) -> GartResult<()> {
        if !self.failed.is_empty() {
            return Err(GartError::Bulk {
                failed: self.failed.len(),
                total: self.dispatched(),
            });
        }
        if !self.cancelled.is_empty() {
            return Err(GartError::Cancelled);
        }
        Ok(())
    }
}

/// Options for the bulk worker pool.
#[derive(Clone, Debug, Default)]
pub struct BulkOpts {
    /// Worker count override. When None, the host's parallelism capped by the FD limit.
    pub num_threads: Option<usize>,
    /// Upper bound on the whole bulk copy; entries not started by then are cancelled.
    pub timeout: Option<Duration>,
    /// Stop dispatching new work after the first failure.
    pub strict: bool,
    /// External cancel signal (e.g. Ctrl+C).
    pub cancel: Option<CancelFlag>,
    /// Show a progress bar while copying.
    pub verbose: bool,
}

/// Lib-only options for [`add_path`](crate::add_path) and [`check_for_changes`](crate::check_for_changes).
#[derive(Clone, Debug, Default)]
pub struct GartOpts {
    /// Worker count override for bulk registration.
    pub num_threads: Option<usize>,
    /// Bulk deadline.
    pub timeout: Option<Duration>,
    /// Fail a bulk run on the first failed entry.
    pub strict: bool,
    /// Extra ignore tokens appended to the built-in list.
    pub exclude: Vec<String>,
    /// Report changes without refreshing the store copy.
    pub dry_run: bool,
}

impl From<&GartOpts> for Opts {
    fn from(o: &GartOpts) -> Self {
        Opts {
            config_path: None,
            store_root: None,
            num_threads: o.num_threads,
            timeout: o.timeout,
            strict: o.strict,
            exclude: o.exclude.clone(),
            verbose: false,
            dry_run: o.dry_run,
            cancel: None,
        }
    }
}

/// Full options (CLI). Use [`GartOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Config file path. When None, `<config_dir>/gart/config.toml`.
    pub config_path: Option<PathBuf>,
    /// Store root. When None, taken from the config file, then the package default.
    pub store_root: Option<PathBuf>,
    pub num_threads: Option<usize>,
    pub timeout: Option<Duration>,
    pub strict: bool,
    /// Extra ignore tokens (config file + CLI).
    pub exclude: Vec<String>,
    /// Verbose logging and progress bar.
    pub verbose: bool,
    /// `update` only: report without refreshing the store.
    pub dry_run: bool,
    pub cancel: Option<CancelFlag>,
}

impl Opts {
    pub(crate) fn bulk_opts(&self) -> BulkOpts {
        BulkOpts {
            num_threads: self.num_threads,
            timeout: self.timeout,
            strict: self.strict,
            cancel: self.cancel.clone(),
            verbose: self.verbose,
        }
    }
}
