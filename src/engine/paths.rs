//! Path resolution: home expansion, lexical cleaning, bulk-pattern detection and store layout.

use std::path::{Component, Path, PathBuf};

use crate::error::{GartError, GartResult};
use crate::utils::config::BULK_SUFFIX;

/// Replace a leading `~` with the home directory. Other paths pass through untouched.
/// Only the current user's home is supported: `~user/...` is a [`GartError::Resolution`].
pub fn expand(path: &str) -> GartResult<PathBuf> {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| GartError::resolution(path, "cannot determine home directory"))?;
            expand_with_home(rest, &home)
        }
        None => Ok(PathBuf::from(path)),
    }
}

/// Join what follows `~` onto `home`. `rest` is `""` or starts with a separator; anything else
/// names another user's home and is rejected.
pub fn expand_with_home(rest: &str, home: &Path) -> GartResult<PathBuf> {
    let Some(tail) = rest
        .strip_prefix('/')
        .or_else(|| rest.strip_prefix(std::path::MAIN_SEPARATOR))
        .or(rest.is_empty().then_some(""))
    else {
        return Err(GartError::resolution(
            format!("~{rest}"),
            "~user expansion is not supported",
        ));
    };
    let tail = tail.trim_start_matches(['/', std::path::MAIN_SEPARATOR]);
    if tail.is_empty() {
        Ok(home.to_path_buf())
    } else {
        Ok(home.join(tail))
    }
}

/// Lexically normalize: drop `.` and duplicate separators, resolve `..` against preceding
/// components. No I/O. An empty result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Expand then clean, and make relative paths absolute against the current directory.
pub fn resolve(path: &str) -> GartResult<PathBuf> {
    absolutize(expand(path)?, path)
}

/// [`resolve`] for a path that is already a `Path` (store roots, index entries).
/// Non-UTF-8 paths skip `~` expansion.
pub fn resolve_path(path: &Path) -> GartResult<PathBuf> {
    match path.to_str() {
        Some(s) => resolve(s),
        None => absolutize(path.to_path_buf(), &path.to_string_lossy()),
    }
}

fn absolutize(expanded: PathBuf, original: &str) -> GartResult<PathBuf> {
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .map_err(|e| GartError::resolution(original, e.to_string()))?
            .join(expanded)
    };
    Ok(clean(&absolute))
}

/// True if `path` ends with the wildcard marker (`~/.config/*`).
pub fn is_bulk_pattern(path: &str) -> bool {
    path.ends_with(BULK_SUFFIX)
}

/// Strip the trailing wildcard, leaving the directory to traverse.
pub fn strip_bulk_suffix(path: &str) -> &str {
    path.strip_suffix(BULK_SUFFIX).unwrap_or(path)
}

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Default dotfile name for a path: its base name, extension trimmed for files.
/// Bulk patterns use the base name of the traversed directory.
pub fn name_from_path(path: &str) -> GartResult<String> {
    let base = if is_bulk_pattern(path) {
        strip_bulk_suffix(path)
    } else {
        path
    };
    let resolved = resolve(base)?;
    let stem = if resolved.is_file() {
        resolved.file_stem()
    } else {
        resolved.file_name()
    };
    stem.and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| GartError::resolution(path, "path has no usable base name"))
}

/// Reject names that would escape or alias the store root.
pub fn validate_name(name: &str) -> GartResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains(std::path::MAIN_SEPARATOR);
    if bad {
        return Err(GartError::resolution(name, "invalid dotfile name"));
    }
    Ok(())
}

/// Where `source` lives in the store: `store_root/name` for directories (and bulk umbrellas),
/// `store_root/name/<file name>` for single files.
pub fn store_location(store_root: &Path, name: &str, source: &Path) -> PathBuf {
    let slot = store_root.join(name);
    if source.is_file()
        && let Some(file_name) = source.file_name()
    {
        return slot.join(file_name);
    }
    slot
}

/// True if either path lies inside the other (or they are equal), compared lexically after cleaning.
/// Both sides must be absolute (see [`resolve_path`]) for the answer to mean anything.
pub fn overlaps(a: &Path, b: &Path) -> bool {
    let (a, b) = (clean(a), clean(b));
    a.starts_with(&b) || b.starts_with(&a)
}

/// Fail with [`GartError::SelfReference`] when `source` and `store_root` overlap.
pub fn check_not_nested(source: &Path, store_root: &Path) -> GartResult<()> {
    if overlaps(source, store_root) {
        return Err(GartError::SelfReference {
            source_path: source.to_path_buf(),
            store_root: store_root.to_path_buf(),
        });
    }
    Ok(())
}
