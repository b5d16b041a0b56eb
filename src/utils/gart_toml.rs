//! Load and save `config.toml`: a `[settings]` section and the `[dotfiles]` name → path table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Opts;
use crate::engine::paths::resolve;
use crate::error::{GartError, GartResult};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GartToml {
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub dotfiles: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SettingsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    /// Bulk deadline in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

fn config_error(path: &Path, reason: impl ToString) -> GartError {
    GartError::Config {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read `path`. A missing file is an empty config; an unreadable or malformed one is an error.
pub fn load_gart_toml(path: &Path) -> GartResult<GartToml> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(GartToml::default());
        }
        Err(e) => return Err(config_error(path, e)),
    };
    toml::from_str(&s).map_err(|e| config_error(path, e))
}

/// Write `config` to `path` via a sibling temp file and rename. Creates the parent directory.
pub fn save_gart_toml(path: &Path, config: &GartToml) -> GartResult<()> {
    let body = toml::to_string_pretty(config).map_err(|e| config_error(path, e))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| config_error(path, e))?;
    }
    let tmp = temp_path_for(path);
    std::fs::write(&tmp, body).map_err(|e| config_error(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| config_error(path, e))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config.toml".to_string());
    path.with_file_name(format!("{name}.tmp"))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &GartToml, opts: &mut Opts) -> GartResult<()> {
    let idx = &file.settings;
    if let Some(ref p) = idx.storage_path {
        opts.store_root = Some(resolve(p)?);
    }
    apply_file_opt!(idx, opts, verbose => verbose);
    apply_file_opt!(idx, opts, strict => strict);
    if let Some(ref v) = idx.exclude {
        opts.exclude = v.clone();
    }
    if let Some(secs) = idx.timeout {
        opts.timeout = Some(Duration::from_secs(secs));
    }
    if let Some(n) = idx.threads {
        opts.num_threads = Some(n);
    }
    Ok(())
}
