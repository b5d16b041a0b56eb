//! Shared helpers for parallel processing.

use log::debug;

use crate::utils::config::WorkerThreadLimits;
use crate::utils::fd_limit::max_workers_by_fd_limit;

/// Worker count for `jobs` units of work: the override, or the host's parallelism capped by the
/// FD limit. Never more than `jobs`, never below the floor.
pub fn worker_count(requested: Option<usize>, jobs: usize) -> usize {
    let limits = WorkerThreadLimits::current();
    let mut n = requested.unwrap_or(limits.all_threads);
    if let Some(fd_cap) = max_workers_by_fd_limit()
        && fd_cap < n
    {
        debug!("Capping workers {} -> {} (descriptor budget)", n, fd_cap);
        n = fd_cap;
    }
    let n = n.min(jobs).max(limits.floor);
    debug!("Copy workers: {} for {} directories", n, jobs);
    n
}
