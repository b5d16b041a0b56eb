use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Dotfile manager: mirror files and directories into a central store and detect drift.
#[derive(Clone, Parser)]
#[command(name = "gart")]
#[command(about = "Copy dotfiles into a central store and detect when they change.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Flags shared by every command.
#[derive(Clone, Debug, Args)]
pub struct CommonArgs {
    /// Config file. Default: `<config dir>/gart/config.toml`.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Store root. Overrides `storage_path` from the config file.
    #[arg(long, short = 's', global = true)]
    pub store: Option<PathBuf>,

    /// Verbose output (debug logs, progress bar, ignored directories).
    #[arg(long, short = 'v', global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Extra ignore tokens for bulk registration. Can specify multiple: -e Steam -e .wine
    #[arg(long, short = 'e', global = true)]
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Add a dotfile or directory. A trailing `*` (e.g. `~/.config/*`) copies every hidden directory under it.
    Add {
        /// Path to register.
        #[arg(value_name = "PATH")]
        path: String,

        /// Name in the store. Default: base name of PATH (extension trimmed for files).
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Copy workers for bulk mode. Default: available parallelism.
        #[arg(long, short = 't')]
        threads: Option<usize>,

        /// Stop a bulk copy after this many seconds; unstarted directories are reported as cancelled.
        #[arg(long, value_parser = clap::value_parser!(u64))]
        timeout: Option<u64>,

        /// Strict mode: stop a bulk copy on the first failed directory.
        #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
        strict: Option<bool>,
    },

    /// Compare registered dotfiles with the store and refresh changed copies.
    Update {
        /// Only this dotfile. Default: all of them.
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Report changes; do not refresh the store.
        #[arg(long)]
        dry_run: bool,
    },

    /// List registered dotfiles.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}
