//! Discovery of bulk candidates: hidden directories directly under the base.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{GartError, GartResult};
use crate::utils::config::HIDDEN_PREFIX;

/// True if the base name starts with the hidden marker.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(HIDDEN_PREFIX) && n != "." && n != "..")
}

/// Immediate children of `base` that are hidden directories (links to directories count), sorted.
/// `base` itself is never returned. Unreadable children are skipped with a warning.
pub fn discover_hidden_dirs(base: &Path) -> GartResult<Vec<PathBuf>> {
    if !base.is_dir() {
        return Err(GartError::resolution(
            base.display().to_string(),
            "bulk root is not a directory",
        ));
    }
    let mut found = Vec::new();
    for result in WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match result {
            Ok(entry) => {
                if entry.file_type().is_dir() && is_hidden(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            Err(err) if err.depth() == 0 => {
                return Err(GartError::resolution(
                    base.display().to_string(),
                    err.to_string(),
                ));
            }
            Err(err) => {
                warn!("Permission denied or error accessing path: {}", err);
            }
        }
    }
    debug!("{} hidden directories under {}", found.len(), base.display());
    Ok(found)
}
