//! Command handlers for add, update and list.

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::Opts;
use crate::add::{AddOutcome, add_path};
use crate::check::check_for_changes;
use crate::engine::arg_parser::{Cli, Commands, CommonArgs};
use crate::engine::paths::{name_from_path, resolve_path};
use crate::error::GartError;
use crate::pipeline::check_bulk_report;
use crate::store::StoreIndex;
use crate::utils::config::PackagePaths;
use crate::utils::gart_toml::{apply_file_to_opts, load_gart_toml};
use crate::utils::{Colors, setup_logging};

/// Built-in defaults < config file < CLI flags.
fn setup_opts(common: &CommonArgs) -> Result<Opts> {
    let config_path = match &common.config {
        Some(p) => p.clone(),
        None => PackagePaths::get().default_config_path()?,
    };
    let mut opts = Opts {
        config_path: Some(config_path.clone()),
        ..Opts::default()
    };
    let file = load_gart_toml(&config_path)?;
    apply_file_to_opts(&file, &mut opts)?;

    if let Some(v) = common.verbose {
        opts.verbose = v;
    }
    if let Some(store) = &common.store {
        opts.store_root = Some(resolve_path(store)?);
    }
    opts.exclude.extend(common.exclude.iter().cloned());
    setup_logging(opts.verbose);
    Ok(opts)
}

fn store_root(opts: &Opts) -> Result<PathBuf> {
    match &opts.store_root {
        Some(p) => Ok(p.clone()),
        None => Ok(PackagePaths::get().default_store_root()?),
    }
}

fn config_path(opts: &Opts) -> Result<PathBuf> {
    match &opts.config_path {
        Some(p) => Ok(p.clone()),
        None => Ok(PackagePaths::get().default_config_path()?),
    }
}

/// Run the parsed command.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let mut opts = setup_opts(&cli.common)?;
    match &cli.command {
        Commands::Add {
            path,
            name,
            threads,
            timeout,
            strict,
        } => {
            if threads.is_some() {
                opts.num_threads = *threads;
            }
            if let Some(secs) = timeout {
                opts.timeout = Some(Duration::from_secs(*secs));
            }
            if let Some(s) = strict {
                opts.strict = *s;
            }
            handle_add(path, name.as_deref(), &mut opts)
        }
        Commands::Update { name, dry_run } => {
            opts.dry_run = *dry_run;
            handle_update(name.as_deref(), &opts)
        }
        Commands::List { json } => handle_list(*json, &opts),
    }
}

/// Register `path` under `name` (or its derived name) and persist the entry.
pub fn handle_add(path: &str, name: Option<&str>, opts: &mut Opts) -> Result<()> {
    let name = match name {
        Some(n) => n.to_string(),
        None => name_from_path(path)?,
    };
    let store_root = store_root(opts)?;
    let config_path = config_path(opts)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    opts.cancel = Some(cancel);

    let outcome = add_path(path, &name, &store_root, &opts.exclude, &opts.bulk_opts())
        .with_context(|| format!("adding {}", path))?;

    // Bulk: the umbrella is saved even when some directories failed; the failures are still returned.
    let bulk_result = match &outcome {
        AddOutcome::Bulk { report, .. } => check_bulk_report(report, opts.verbose),
        AddOutcome::Single { .. } => Ok(()),
    };
    let index = StoreIndex::load(&config_path)?;
    let entry = outcome.entry();
    if let Some(previous) = index.insert(&entry.name, &entry.source_path) {
        info!(
            "Replaced '{}' (was {})",
            entry.name,
            previous.display()
        );
    }
    index
        .save(&config_path)
        .with_context(|| format!("saving {}", config_path.display()))?;
    bulk_result?;
    Ok(())
}

/// Check one dotfile or all of them. With all, a failing entry is logged and the rest still run.
pub fn handle_update(name: Option<&str>, opts: &Opts) -> Result<()> {
    let store_root = store_root(opts)?;
    let index = StoreIndex::load(&config_path(opts)?)?;
    if opts.dry_run {
        warn!("RUNNING IN DRY-RUN MODE. THE STORE WILL NOT BE UPDATED.");
    }

    if let Some(name) = name {
        let source = index
            .get(name)
            .ok_or_else(|| GartError::NotFound(name.to_string()))?;
        check_for_changes(name, &source, &store_root, opts)
            .with_context(|| format!("comparing '{}'", name))?;
        return Ok(());
    }

    if index.is_empty() {
        info!("No dotfiles found. Please add some dotfiles first.");
        return Ok(());
    }
    let mut failed = 0_usize;
    for entry in index.entries() {
        if let Err(e) = check_for_changes(&entry.name, &entry.source_path, &store_root, opts) {
            error!("Error comparing '{}': {}", entry.name, e);
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{} of {} dotfiles could not be compared", failed, index.len());
    }
    Ok(())
}

/// Print the registered entries as a two-column table or JSON.
pub fn handle_list(json: bool, opts: &Opts) -> Result<()> {
    let index = StoreIndex::load(&config_path(opts)?)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&index.to_map())?);
        return Ok(());
    }
    if index.is_empty() {
        println!("No dotfiles found. Please add some dotfiles first.");
        return Ok(());
    }
    let entries = index.entries();
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);
    println!("{:<width$}  {}", "Name", "Path", width = width);
    for entry in entries {
        println!(
            "{}  {}",
            Colors::colorize(Colors::NAME, &format!("{:<width$}", entry.name, width = width)),
            Colors::colorize(Colors::PATH, &entry.source_path.display().to_string())
        );
    }
    Ok(())
}
