//! Change detection: compare a registered source against its store copy, refreshing the copy when it drifted.

use log::{debug, info};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::engine::copy::{copy_directory, mirror, prune};
use crate::engine::diff::diff;
use crate::engine::filter::IgnoreFilter;
use crate::engine::paths::{
    check_not_nested, clean, is_bulk_pattern, path_relative_to, resolve_path, store_location,
    strip_bulk_suffix, validate_name,
};
use crate::error::{GartError, GartResult};
use crate::pipeline::{BulkJob, plan_bulk, run_jobs};
use crate::types::{BulkReport, DiffResult};
use crate::utils::Colors;

/// Compare `source_path` (as stored in the index) with its copy under `store_root`.
///
/// - No copy yet: the baseline is created and `baseline_created` is set; nothing is reported as changed.
/// - Changed and not `opts.dry_run`: the store copy is refreshed from the source (one direction only),
///   so an immediate second check reports no change.
pub fn check_for_changes(
    name: &str,
    source_path: &Path,
    store_root: &Path,
    opts: &Opts,
) -> GartResult<DiffResult> {
    validate_name(name)?;
    let store_root = &resolve_path(store_root)?;
    let source_str = source_path.to_string_lossy();
    let result = if is_bulk_pattern(&source_str) {
        let base = clean(Path::new(strip_bulk_suffix(&source_str)));
        check_bulk(name, &base, store_root, opts)?
    } else {
        check_single(name, source_path, store_root, opts)?
    };
    print_diff(name, &result);
    Ok(result)
}

fn check_single(
    name: &str,
    source: &Path,
    store_root: &Path,
    opts: &Opts,
) -> GartResult<DiffResult> {
    check_not_nested(source, store_root)?;
    let store_path = store_location(store_root, name, source);
    if fs::symlink_metadata(&store_path).is_err() {
        debug!("No stored copy for '{}', creating baseline", name);
        copy_directory(source, &store_path)?;
        return Ok(DiffResult {
            baseline_created: true,
            ..DiffResult::default()
        });
    }

    let result = diff(source, &store_path)?;
    if result.changed() && !opts.dry_run {
        mirror(source, &store_path, &result.removed)?;
    }
    Ok(result)
}

/// Bulk umbrella: rediscover qualifying directories and diff each against `store_root/name/<rel>`.
/// Stored directories that no longer qualify count as removed.
fn check_bulk(name: &str, base: &Path, store_root: &Path, opts: &Opts) -> GartResult<DiffResult> {
    let dest_root = store_root.join(name);
    let filter = IgnoreFilter::new(store_root, &opts.exclude);
    let plan = plan_bulk(base, &dest_root, &filter)?;

    if fs::symlink_metadata(&dest_root).is_err() {
        debug!("No stored copy for '{}', creating baseline", name);
        refresh_bulk(plan.jobs, &dest_root, &[], opts)?;
        return Ok(DiffResult {
            baseline_created: true,
            ..DiffResult::default()
        });
    }

    let mut result = DiffResult::default();
    let planned: HashSet<&Path> = plan.jobs.iter().map(|j| j.dest.as_path()).collect();
    let listing = fs::read_dir(&dest_root).map_err(|e| GartError::diff(&dest_root, e))?;
    for entry in listing {
        let entry = entry.map_err(|e| GartError::diff(&dest_root, e))?;
        if !planned.contains(entry.path().as_path()) {
            result.removed.push(PathBuf::from(entry.file_name()));
        }
    }

    let mut stale_jobs = Vec::new();
    for job in plan.jobs {
        let rel = path_relative_to(&job.dest, &dest_root).unwrap_or_default();
        if fs::symlink_metadata(&job.dest).is_err() {
            result.added.push(rel);
            stale_jobs.push(job);
            continue;
        }
        let sub = diff(&job.source, &job.dest)?;
        if sub.changed() {
            result.absorb(&rel, sub);
            stale_jobs.push(job);
        }
    }
    result.sort();

    if result.changed() && !opts.dry_run {
        refresh_bulk(stale_jobs, &dest_root, &result.removed, opts)?;
    }
    Ok(result)
}

/// Re-copy `jobs` with the worker pool, then delete `removed` (relative to `dest_root`).
fn refresh_bulk(
    jobs: Vec<BulkJob>,
    dest_root: &Path,
    removed: &[PathBuf],
    opts: &Opts,
) -> GartResult<()> {
    let mut report = BulkReport::default();
    if !jobs.is_empty() {
        run_jobs(jobs, &opts.bulk_opts(), &mut report);
    } else {
        fs::create_dir_all(dest_root).map_err(|e| GartError::copy(dest_root, e))?;
    }
    report.ensure_success()?;
    prune(dest_root, removed)
}

/// Log the verdict for one entry.
fn print_diff(name: &str, diff: &DiffResult) {
    if diff.baseline_created {
        info!("Stored a first copy of '{}'", name);
        return;
    }
    if !diff.changed() {
        info!("No changes detected in '{}' since the last update.", name);
        return;
    }
    info!(
        "Changes detected in '{}': {} | {} | {}",
        name,
        Colors::colorize(Colors::ADDED, &format!("Added: {}", diff.added.len())),
        Colors::colorize(Colors::REMOVED, &format!("Removed: {}", diff.removed.len())),
        Colors::colorize(Colors::MODIFIED, &format!("Modified: {}", diff.modified.len()))
    );
    for path in diff.details() {
        debug!("  {}", path.display());
    }
}
