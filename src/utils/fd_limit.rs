//! Descriptor budget for the bulk copy pool.
//!
//! A copy worker runs one `walkdir` walk, which keeps at most [`WALK_MAX_OPEN`] directory handles
//! open, and one `fs::copy` at a time (source plus destination).

/// `walkdir`'s default cap on directory handles held open by one walk.
pub const WALK_MAX_OPEN: usize = 10;

/// Descriptors one copy worker can hold at once.
pub const FDS_PER_WORKER: usize = WALK_MAX_OPEN + 2;

/// Kept back for stdio, the log sink, the config file and the hashing done by `update`.
const RESERVED_FDS: u64 = 32;

/// Soft `RLIMIT_NOFILE`, or `None` when unlimited or unknown.
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into `rlim`.
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) } != 0 {
        return None;
    }
    if rlim.rlim_cur == libc::RLIM_INFINITY {
        return None;
    }
    u64::try_from(rlim.rlim_cur).ok()
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// How many copy workers fit in the descriptor budget. At least one; `None` without a limit.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let budget = max_open_fds()?.saturating_sub(RESERVED_FDS);
    let workers = usize::try_from(budget).unwrap_or(usize::MAX) / FDS_PER_WORKER;
    Some(workers.max(1))
}
