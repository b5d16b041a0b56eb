//! gart CLI: add dotfiles to the store, check them for changes, list them.

use anyhow::Result;
use clap::Parser;
use gart::engine::arg_parser::Cli;
use gart::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
