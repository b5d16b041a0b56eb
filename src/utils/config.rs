//! Application configuration constants.
//! Tuning, thresholds and default locations in one place.

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{GartError, GartResult};

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    store_dir_name: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| PackagePaths {
            pkg_name: env!("CARGO_PKG_NAME"),
            config_filename: "config.toml".to_string(),
            store_dir_name: ".store".to_string(),
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    pub fn store_dir_name(&self) -> &str {
        &self.store_dir_name
    }

    /// `<config_dir>/gart`.
    pub fn config_dir(&self) -> GartResult<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(self.pkg_name))
            .ok_or_else(|| GartError::resolution("config dir", "cannot determine config directory"))
    }

    /// `<config_dir>/gart/config.toml`.
    pub fn default_config_path(&self) -> GartResult<PathBuf> {
        Ok(self.config_dir()?.join(&self.config_filename))
    }

    /// `<config_dir>/gart/.store`.
    pub fn default_store_root(&self) -> GartResult<PathBuf> {
        Ok(self.config_dir()?.join(&self.store_dir_name))
    }
}

// ---- Ignore list ----

/// Built-in ignore tokens for bulk registration. Matched as plain substrings of the candidate path.
pub struct IgnoreTokens;

impl IgnoreTokens {
    pub const DEFAULT: &'static [&'static str] = &[
        // version control
        ".git",
        ".svn",
        ".hg",
        // package managers and toolchains
        ".cache",
        ".npm",
        ".yarn",
        ".cargo",
        ".rustup",
        ".gradle",
        ".m2",
        "node_modules",
        // build output
        "target",
        "__pycache__",
        ".venv",
        // editor and desktop state
        ".idea",
        ".vscode",
        ".local",
        ".Trash",
    ];
}

// ---- Worker threads ----

/// Thread limits for the bulk copy pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }
}

/// Capacity of the bulk work queue. The dispatcher blocks when workers fall this far behind.
pub const BULK_QUEUE_CAP: usize = 64;

// ---- Hashing ----

/// Hashing I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
    /// Chunk size for reading files below mmap threshold (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

// ---- Bulk patterns ----

/// Trailing marker that switches `add` into bulk mode (`~/.config/*`).
pub const BULK_SUFFIX: char = '*';

/// Leading marker of entries picked up by bulk registration.
pub const HIDDEN_PREFIX: char = '.';
