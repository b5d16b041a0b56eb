pub mod config;
pub mod fd_limit;
pub mod gart_toml;
pub mod logger;

pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, WALK_MAX_OPEN, max_open_fds, max_workers_by_fd_limit};
pub use gart_toml::{GartToml, SettingsSection, load_gart_toml, save_gart_toml};
pub use logger::{Colors, setup_logging};
