//! Registration: copy a single path, or every qualifying hidden directory under a root, into the store.

use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};

use crate::engine::copy::{copy_directory, prune};
use crate::engine::filter::IgnoreFilter;
use crate::engine::paths::{
    check_not_nested, is_bulk_pattern, resolve, resolve_path, store_location, strip_bulk_suffix,
    validate_name,
};
use crate::error::{GartError, GartResult};
use crate::pipeline::{execute_plan, plan_bulk};
use crate::types::{BulkOpts, BulkReport, CopyStats, DotfileEntry};
use crate::utils::config::BULK_SUFFIX;

/// What a registration produced. The caller persists [`AddOutcome::entry`] into the store index.
#[derive(Debug)]
pub enum AddOutcome {
    Single {
        entry: DotfileEntry,
        store_path: PathBuf,
        stats: CopyStats,
    },
    Bulk {
        entry: DotfileEntry,
        report: BulkReport,
    },
}

impl AddOutcome {
    pub fn entry(&self) -> &DotfileEntry {
        match self {
            AddOutcome::Single { entry, .. } | AddOutcome::Bulk { entry, .. } => entry,
        }
    }
}

/// Drop whatever an earlier registration left under `store_root/name`. Last write wins.
fn clear_slot(store_root: &Path, name: &str) -> GartResult<()> {
    prune(store_root, &[PathBuf::from(name)])
}

/// Resolve `source` (`~` expanded, cleaned, absolute) and copy it to its store location.
/// Files and directories are detected automatically.
pub fn add_single(source: &str, name: &str, store_root: &Path) -> GartResult<AddOutcome> {
    validate_name(name)?;
    let store_root = &resolve_path(store_root)?;
    let src = resolve(source)?;
    if !src.exists() {
        return Err(GartError::copy(
            &src,
            io::Error::new(io::ErrorKind::NotFound, "source does not exist"),
        ));
    }
    check_not_nested(&src, store_root)?;

    let store_path = store_location(store_root, name, &src);
    clear_slot(store_root, name)?;
    let stats = copy_directory(&src, &store_path)?;
    debug!(
        "{} -> {} ({} files, {} dirs)",
        src.display(),
        store_path.display(),
        stats.files,
        stats.dirs
    );
    info!("Dotfile added: {}", name);
    Ok(AddOutcome::Single {
        entry: DotfileEntry {
            name: name.to_string(),
            source_path: src,
        },
        store_path,
        stats,
    })
}

/// Copy every hidden directory under the root of `pattern` (`~/.config/*`) into `store_root/name/`.
/// Only the umbrella entry `name → <root>/*` is returned for persistence; discovered directories
/// are not indexed individually. Per-directory failures are in the report, not the error.
///
/// The root is discovered and filtered before the previous copy under `store_root/name` is
/// dropped, so a bad root leaves an earlier registration intact.
pub fn add_bulk(
    pattern: &str,
    name: &str,
    store_root: &Path,
    filter: &IgnoreFilter,
    opts: &BulkOpts,
) -> GartResult<AddOutcome> {
    validate_name(name)?;
    let store_root = resolve_path(store_root)?;
    let base = resolve(strip_bulk_suffix(pattern))?;
    let plan = plan_bulk(&base, &store_root.join(name), filter)?;
    clear_slot(&store_root, name)?;
    let report = execute_plan(plan, opts);
    Ok(AddOutcome::Bulk {
        entry: DotfileEntry {
            name: name.to_string(),
            source_path: base.join(BULK_SUFFIX.to_string()),
        },
        report,
    })
}

/// Dispatch on the shape of `path`: bulk pattern or single target.
pub fn add_path(
    path: &str,
    name: &str,
    store_root: &Path,
    exclude: &[String],
    opts: &BulkOpts,
) -> GartResult<AddOutcome> {
    if is_bulk_pattern(path) {
        let filter = IgnoreFilter::new(store_root, exclude);
        add_bulk(path, name, store_root, &filter, opts)
    } else {
        add_single(path, name, store_root)
    }
}
