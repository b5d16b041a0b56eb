use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use std::thread::{self, JoinHandle};

use crate::engine::copy::copy_directory;

use super::context::{BulkJob, JobOutcome, WorkerContext};

/// Single copy worker: take jobs from `job_rx` until the queue closes, report each on `outcome_tx`.
/// Once the context says stop, remaining jobs are drained as cancelled.
fn copy_worker_loop(
    job_rx: Receiver<BulkJob>,
    outcome_tx: Sender<JobOutcome>,
    ctx: WorkerContext,
) {
    while let Ok(job) = job_rx.recv() {
        if ctx.should_stop() {
            let _ = outcome_tx.send(JobOutcome::Cancelled { source: job.source });
            continue;
        }
        let outcome = match copy_directory(&job.source, &job.dest) {
            Ok(stats) => {
                debug!(
                    "copied {} -> {} ({} files)",
                    job.source.display(),
                    job.dest.display(),
                    stats.files
                );
                JobOutcome::Copied {
                    source: job.source,
                    dest: job.dest,
                    stats,
                }
            }
            Err(error) => {
                warn!("Failed to copy {}: {}", job.source.display(), error);
                ctx.on_failure();
                JobOutcome::Failed {
                    source: job.source,
                    error,
                }
            }
        };
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
    drop(outcome_tx);
}

/// Spawn copy workers reading from `job_rx`. Caller must drop its `outcome_tx` after this so the outcome channel closes.
pub fn spawn_copy_workers(
    job_rx: Receiver<BulkJob>,
    outcome_tx: &Sender<JobOutcome>,
    ctx: &WorkerContext,
    num_threads: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_threads)
        .map(|_| {
            let job_rx = job_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || copy_worker_loop(job_rx, outcome_tx, ctx))
        })
        .collect()
}

/// Feed `jobs` into the queue on a separate thread. Stops early when the context says stop; the
/// returned handle yields the sources that were never queued.
pub fn spawn_dispatch_thread(
    jobs: Vec<BulkJob>,
    job_tx: Sender<BulkJob>,
    ctx: WorkerContext,
) -> JoinHandle<Vec<std::path::PathBuf>> {
    thread::spawn(move || {
        let mut unsent = Vec::new();
        let mut jobs = jobs.into_iter();
        for job in jobs.by_ref() {
            if ctx.should_stop() {
                unsent.push(job.source);
                break;
            }
            if let Err(err) = job_tx.send(job) {
                unsent.push(err.into_inner().source);
                break;
            }
        }
        unsent.extend(jobs.map(|job| job.source));
        drop(job_tx);
        unsent
    })
}
