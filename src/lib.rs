//! gart: dotfile manager that mirrors registered paths into a central store and detects drift

pub mod add;
pub mod check;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::{GartError, GartResult};
pub use store::StoreIndex;
pub use types::*;

use log::debug;
use std::path::Path;

/// Result alias used by the application layer
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use add::{AddOutcome, add_bulk, add_single};

/// Register `path` under `name` in `store_root`.
///
/// - **Single target** (`~/.config/nvim`, `~/.zshrc`): resolved, copied to `store_root/name`
///   (files to `store_root/name/<file name>`).
/// - **Bulk pattern** (`~/.config/*`): every hidden directory directly under the root that passes the
///   ignore filter is copied to `store_root/name/<dir>` by a worker pool. Failures are in the report.
///
/// The returned entry is what the caller persists in its [`StoreIndex`].
pub fn add_path(path: &str, name: &str, store_root: &Path, opts: &GartOpts) -> GartResult<AddOutcome> {
    let opts = Opts::from(opts);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    add::add_path(path, name, store_root, &opts.exclude, &opts.bulk_opts())
}

/// Compare the source registered as `name` with its store copy and refresh the copy if it drifted.
///
/// Pass `source_path` as stored in the index (a bulk umbrella keeps its trailing `*`).
/// A missing store copy is created first and reported with `baseline_created`.
pub fn check_for_changes(
    name: &str,
    source_path: &Path,
    store_root: &Path,
    opts: &GartOpts,
) -> GartResult<DiffResult> {
    check::check_for_changes(name, source_path, store_root, &Opts::from(opts))
}
