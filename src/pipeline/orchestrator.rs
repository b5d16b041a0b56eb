use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::engine::filter::IgnoreFilter;
use crate::engine::parallel::worker_count;
use crate::engine::paths::path_relative_to;
use crate::engine::progress::{ProgressBarConfig, create_progress_bar, update_progress_bar};
use crate::error::GartResult;
use crate::types::{BulkOpts, BulkReport};
use crate::utils::config::BULK_QUEUE_CAP;

use super::context::{BulkJob, JobOutcome, WorkerContext, create_bulk_channels};
use super::discover::discover_hidden_dirs;
use super::workers::{spawn_copy_workers, spawn_dispatch_thread};

/// Qualifying directories and their store destinations, plus what the filter rejected.
#[derive(Debug, Default)]
pub struct BulkPlan {
    pub jobs: Vec<BulkJob>,
    pub ignored: Vec<PathBuf>,
}

/// Discover hidden directories under `base`, filter them, and map each to
/// `dest_root/<path relative to base>`. Destinations are pairwise distinct.
pub fn plan_bulk(base: &Path, dest_root: &Path, filter: &IgnoreFilter) -> GartResult<BulkPlan> {
    let mut plan = BulkPlan::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for dir in discover_hidden_dirs(base)? {
        if let Some(reason) = filter.check(&dir) {
            debug!("Ignored directory {} ({:?})", dir.display(), reason);
            plan.ignored.push(dir);
            continue;
        }
        let Some(rel) = path_relative_to(&dir, base) else {
            continue;
        };
        let dest = dest_root.join(&rel);
        if !seen.insert(dest.clone()) {
            warn!("Skipping {}: destination already claimed", dir.display());
            continue;
        }
        plan.jobs.push(BulkJob { source: dir, dest });
    }
    Ok(plan)
}

/// Copy every qualifying hidden directory under `base` into `store_root/name/` with a fixed worker pool.
///
/// Best effort: a failed directory is recorded in the report and does not stop its siblings
/// (unless `opts.strict`). Returns once every dispatched job was handled.
pub fn register_bulk(
    base: &Path,
    name: &str,
    store_root: &Path,
    filter: &IgnoreFilter,
    opts: &BulkOpts,
) -> GartResult<BulkReport> {
    let plan = plan_bulk(base, &store_root.join(name), filter)?;
    if plan.jobs.is_empty() {
        debug!("Nothing to copy under {}", base.display());
    }
    Ok(execute_plan(plan, opts))
}

/// Run a prepared plan. The filter's rejections carry over into the report.
pub fn execute_plan(plan: BulkPlan, opts: &BulkOpts) -> BulkReport {
    let mut report = BulkReport {
        ignored: plan.ignored,
        ..BulkReport::default()
    };
    if !plan.jobs.is_empty() {
        run_jobs(plan.jobs, opts, &mut report);
    }
    report
}

/// Dispatch → bounded job queue → workers (copy) → outcome channel → report.
pub fn run_jobs(jobs: Vec<BulkJob>, opts: &BulkOpts, report: &mut BulkReport) {
    let total = jobs.len();
    let num_threads = worker_count(opts.num_threads, total);
    let ctx = WorkerContext::new(
        opts.cancel.clone(),
        opts.timeout.map(|t| Instant::now() + t),
        opts.strict,
    );
    let channels = create_bulk_channels(BULK_QUEUE_CAP.min(total));

    let dispatch_handle = spawn_dispatch_thread(jobs, channels.job_tx, ctx.clone());
    let worker_handles =
        spawn_copy_workers(channels.job_rx, &channels.outcome_tx, &ctx, num_threads);

    // Dropping the last sender closes the channel once workers exit.
    drop(channels.outcome_tx);

    let bar = opts
        .verbose
        .then(|| create_progress_bar(ProgressBarConfig::new(total, "Copying")));
    while let Ok(outcome) = channels.outcome_rx.recv() {
        match outcome {
            JobOutcome::Copied { source, dest, .. } => report.copied.push((source, dest)),
            JobOutcome::Failed { source, error } => report.failed.push((source, error)),
            JobOutcome::Cancelled { source } => report.cancelled.push(source),
        }
        if let Some(bar) = &bar {
            update_progress_bar(bar, 1);
        }
    }

    match dispatch_handle.join() {
        Ok(unsent) => report.cancelled.extend(unsent),
        Err(_) => warn!("dispatch thread panicked"),
    }
    for h in worker_handles {
        if h.join().is_err() {
            warn!("copy worker panicked");
        }
    }
    report.copied.sort();
    report.cancelled.sort();
    debug!(
        "bulk: {} copied, {} failed, {} cancelled of {}",
        report.copied.len(),
        report.failed.len(),
        report.cancelled.len(),
        total
    );
}
