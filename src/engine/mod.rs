//! Engine module for path resolution, filtering, copying, diffing and the CLI surface

pub mod arg_parser;
pub mod copy;
pub mod diff;
pub mod filter;
pub mod handlers;
pub mod hashing;
pub mod parallel;
pub mod paths;
pub mod progress;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, CommonArgs};
pub use copy::{copy_directory, copy_file, mirror, prune};
pub use diff::{NodeKind, Snapshot, compare_snapshots, diff, snapshot};
pub use filter::{IgnoreFilter, IgnoreReason, should_ignore};
pub use handlers::{handle_add, handle_list, handle_run, handle_update};
pub use hashing::{hash_file, same_content};
pub use parallel::worker_count;
pub use paths::{
    check_not_nested, clean, expand, expand_with_home, is_bulk_pattern, name_from_path, overlaps,
    path_relative_to, resolve, resolve_path, store_location, strip_bulk_suffix, validate_name,
};
