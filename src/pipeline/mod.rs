//! Bulk registration pipeline: discovery, filtering, bounded job queue, copy workers.

pub mod context;
pub mod discover;
pub mod error_handler;
pub mod orchestrator;
pub mod workers;

pub use context::{BulkChannels, BulkJob, JobOutcome, WorkerContext, create_bulk_channels};
pub use discover::{discover_hidden_dirs, is_hidden};
pub use error_handler::check_bulk_report;
pub use orchestrator::{BulkPlan, execute_plan, plan_bulk, register_bulk, run_jobs};
pub use workers::{spawn_copy_workers, spawn_dispatch_thread};
