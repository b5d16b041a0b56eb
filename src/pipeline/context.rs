//! Bulk pipeline context: jobs, outcomes, channels and the shared stop condition.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::error::GartError;
use crate::types::{CancelFlag, CopyStats};

/// One hidden directory to copy into the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkJob {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// What a worker did with a job.
#[derive(Debug)]
pub enum JobOutcome {
    Copied {
        source: PathBuf,
        dest: PathBuf,
        stats: CopyStats,
    },
    Failed {
        source: PathBuf,
        error: GartError,
    },
    Cancelled {
        source: PathBuf,
    },
}

/// Shared by the dispatcher and every worker: when to stop taking new jobs.
#[derive(Clone, Debug)]
pub struct WorkerContext {
    pub cancel: CancelFlag,
    pub deadline: Option<Instant>,
    pub strict: bool,
}

impl WorkerContext {
    pub fn new(cancel: Option<CancelFlag>, deadline: Option<Instant>, strict: bool) -> Self {
        Self {
            cancel: cancel.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            deadline,
            strict,
        }
    }

    /// Cancel flag raised or deadline passed.
    pub fn should_stop(&self) -> bool {
        self.cancel.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Called on a failed job; strict runs stop dispatching.
    pub fn on_failure(&self) {
        if self.strict {
            self.cancel.store(true, Ordering::Relaxed);
        }
    }
}

/// Job queue (bounded) and outcome channel. Dispatcher gets `job_tx`; workers get `job_rx` and `outcome_tx`.
pub struct BulkChannels {
    pub job_tx: Sender<BulkJob>,
    pub job_rx: Receiver<BulkJob>,
    pub outcome_tx: Sender<JobOutcome>,
    pub outcome_rx: Receiver<JobOutcome>,
}

pub fn create_bulk_channels(queue_cap: usize) -> BulkChannels {
    let cap = queue_cap.max(1);
    let (job_tx, job_rx) = bounded::<BulkJob>(cap);
    let (outcome_tx, outcome_rx) = bounded::<JobOutcome>(cap);
    BulkChannels {
        job_tx,
        job_rx,
        outcome_tx,
        outcome_rx,
    }
}
