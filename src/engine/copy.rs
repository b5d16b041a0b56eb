//! Copy engine: single files and whole subtrees into the store.
//!
//! Directory copies keep going past failed entries and report the first failure with a count;
//! whatever was written stays in place.

use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::paths::path_relative_to;
use crate::error::{GartError, GartResult};
use crate::types::CopyStats;
use crate::utils::fd_limit::WALK_MAX_OPEN;

/// Copy one file's bytes and permission bits to `dst`, creating parent directories.
/// An existing file (or directory) at `dst` is replaced.
pub fn copy_file(src: &Path, dst: &Path) -> GartResult<()> {
    copy_file_inner(src, dst).map_err(|e| GartError::copy(src, e))
}

fn copy_file_inner(src: &Path, dst: &Path) -> io::Result<()> {
    ensure_parent(dst)?;
    clear_destination(dst, false)?;
    // fs::copy carries the permission bits over.
    fs::copy(src, dst)?;
    Ok(())
}

/// Create the parent directory of `dst`, replacing a non-directory that sits where it should be.
fn ensure_parent(dst: &Path) -> io::Result<()> {
    let Some(parent) = dst.parent() else {
        return Ok(());
    };
    if let Ok(meta) = fs::symlink_metadata(parent)
        && !meta.is_dir()
    {
        fs::remove_file(parent)?;
    }
    fs::create_dir_all(parent)
}

/// Remove whatever sits at `dst` unless it already has the wanted kind.
/// Read-only files are removed rather than opened for writing.
fn clear_destination(dst: &Path, want_dir: bool) -> io::Result<()> {
    let meta = match fs::symlink_metadata(dst) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    let is_dir = meta.is_dir();
    match (is_dir, want_dir) {
        (true, true) => Ok(()),
        (true, false) => fs::remove_dir_all(dst),
        (false, _) => fs::remove_file(dst),
    }
}

/// Recursively mirror `src` into `dst`, preserving relative layout and permissions.
/// `src` may also be a single file, in which case this is [`copy_file`].
pub fn copy_directory(src: &Path, dst: &Path) -> GartResult<CopyStats> {
    // The root is followed when it is a link, like the walk below does.
    let src_meta = fs::metadata(src).map_err(|e| GartError::copy(src, e))?;
    if !src_meta.is_dir() {
        copy_file(src, dst)?;
        return Ok(CopyStats {
            files: 1,
            ..CopyStats::default()
        });
    }

    let mut stats = CopyStats::default();
    let mut failures: Vec<(PathBuf, io::Error)> = Vec::new();

    // Contents first: files create their parents on demand, and a directory's mode is applied
    // only after everything inside it was written.
    for result in WalkDir::new(src)
        .follow_links(false)
        .contents_first(true)
        .max_open(WALK_MAX_OPEN)
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(src).to_path_buf();
                warn!("Cannot read {}: {}", path.display(), err);
                failures.push((path, io::Error::other(err.to_string())));
                continue;
            }
        };
        let rel = path_relative_to(entry.path(), src).unwrap_or_default();
        let target = if rel.as_os_str().is_empty() {
            dst.to_path_buf()
        } else {
            dst.join(&rel)
        };
        let file_type = entry.file_type();
        let outcome = if file_type.is_dir() {
            copy_dir_node(entry.path(), &target).map(|_| stats.dirs += 1)
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target).map(|_| stats.symlinks += 1)
        } else if file_type.is_file() {
            copy_file_inner(entry.path(), &target).map(|_| stats.files += 1)
        } else {
            debug!("skipping special file {}", entry.path().display());
            Ok(())
        };
        if let Err(e) = outcome {
            debug!("copy {} -> {} failed: {}", entry.path().display(), target.display(), e);
            failures.push((entry.path().to_path_buf(), e));
        }
    }

    match failures.len() {
        0 => Ok(stats),
        failed => {
            let (path, source) = failures.swap_remove(0);
            Err(GartError::Copy {
                path,
                failed,
                source,
            })
        }
    }
}

/// Create `dst` as a directory and copy the mode of `src`. Store directories stay owner-writable.
fn copy_dir_node(src: &Path, dst: &Path) -> io::Result<()> {
    clear_destination(dst, true)?;
    fs::create_dir_all(dst)?;
    let perms = fs::metadata(src)?.permissions();
    fs::set_permissions(dst, writable_dir_permissions(perms))
}

#[cfg(unix)]
fn writable_dir_permissions(perms: fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(perms.mode() | 0o700)
}

#[cfg(not(unix))]
fn writable_dir_permissions(mut perms: fs::Permissions) -> fs::Permissions {
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    perms
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    ensure_parent(dst)?;
    clear_destination(dst, false)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::metadata(src)?.is_dir() {
        return copy_directory(src, dst)
            .map(|_| ())
            .map_err(|e| io::Error::other(e.to_string()));
    }
    copy_file_inner(src, dst)
}

/// Make `dst` an exact copy of `src`: copy everything, then delete what `src` no longer has.
/// `removed` are paths relative to `dst` known to be gone from the source.
pub fn mirror(src: &Path, dst: &Path, removed: &[PathBuf]) -> GartResult<CopyStats> {
    let stats = copy_directory(src, dst)?;
    prune(dst, removed)?;
    Ok(stats)
}

/// Delete `removed` (relative to `root`). Deepest paths first; already-missing paths are fine.
pub fn prune(root: &Path, removed: &[PathBuf]) -> GartResult<()> {
    let mut ordered: Vec<&PathBuf> = removed.iter().collect();
    ordered.sort_by_key(|p| std::cmp::Reverse(p.components().count()));
    for rel in ordered {
        if rel.as_os_str().is_empty() {
            continue;
        }
        let path = root.join(rel);
        let outcome = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => debug!("pruned {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(GartError::copy(path, e)),
        }
    }
    Ok(())
}
