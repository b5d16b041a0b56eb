//! Source-vs-store comparison.
//!
//! Both trees are snapshotted (relative path → kind), the path sets compared, then files present on
//! both sides are compared by size and blake3 digest in parallel.

use log::debug;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::hashing::same_content;
use crate::engine::paths::path_relative_to;
use crate::error::{GartError, GartResult};
use crate::types::DiffResult;

/// What sits at a relative path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File { size: u64 },
    Dir,
    Symlink { target: PathBuf },
    Other,
}

impl NodeKind {
    fn from_metadata(path: &Path, meta: &fs::Metadata) -> io::Result<Self> {
        let ft = meta.file_type();
        Ok(if ft.is_symlink() {
            NodeKind::Symlink {
                target: fs::read_link(path)?,
            }
        } else if ft.is_dir() {
            NodeKind::Dir
        } else if ft.is_file() {
            NodeKind::File { size: meta.len() }
        } else {
            NodeKind::Other
        })
    }

    fn same_kind(&self, other: &NodeKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Relative path → kind for everything under `root`. A file root maps the empty path to itself.
pub type Snapshot = BTreeMap<PathBuf, NodeKind>;

fn walk_error(root: &Path, err: walkdir::Error) -> GartError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let kind = err
        .io_error()
        .map(io::Error::kind)
        .unwrap_or(io::ErrorKind::Other);
    GartError::diff(path, io::Error::new(kind, err.to_string()))
}

/// Walk `root` without following links below it (the root itself is followed).
pub fn snapshot(root: &Path) -> GartResult<Snapshot> {
    let root_meta = fs::metadata(root).map_err(|e| GartError::diff(root, e))?;
    let mut snap = Snapshot::new();
    if !root_meta.is_dir() {
        let kind = NodeKind::from_metadata(root, &root_meta).map_err(|e| GartError::diff(root, e))?;
        snap.insert(PathBuf::new(), kind);
        return Ok(snap);
    }
    for result in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = result.map_err(|e| walk_error(root, e))?;
        let meta = entry.metadata().map_err(|e| walk_error(root, e))?;
        let kind =
            NodeKind::from_metadata(entry.path(), &meta).map_err(|e| GartError::diff(entry.path(), e))?;
        let rel = path_relative_to(entry.path(), root).unwrap_or_else(|| entry.path().to_path_buf());
        snap.insert(rel, kind);
    }
    Ok(snap)
}

/// Compare `source` against `store`. Deletions on either side count as changes.
/// `store` must exist; callers materialize a baseline first.
pub fn diff(source: &Path, store: &Path) -> GartResult<DiffResult> {
    let src_snap = snapshot(source)?;
    let store_snap = snapshot(store)?;
    let mut result = compare_snapshots(&src_snap, &store_snap);

    // Files present on both sides with equal size: compare content.
    let candidates: Vec<&PathBuf> = src_snap
        .iter()
        .filter_map(|(rel, kind)| match (kind, store_snap.get(rel)) {
            (NodeKind::File { size: a }, Some(NodeKind::File { size: b })) if a == b => Some(rel),
            _ => None,
        })
        .collect();

    let modified: Vec<PathBuf> = candidates
        .par_iter()
        .map(|rel| {
            let (a, b) = (join_rel(source, rel), join_rel(store, rel));
            match same_content(&a, &b) {
                Ok(true) => Ok(None),
                Ok(false) => Ok(Some((*rel).clone())),
                Err(e) => Err(GartError::diff(a, e)),
            }
        })
        .collect::<GartResult<Vec<Option<PathBuf>>>>()?
        .into_iter()
        .flatten()
        .collect();
    result.modified.extend(modified);
    result.sort();

    debug!(
        "diff {} vs {}: {} added, {} removed, {} modified",
        source.display(),
        store.display(),
        result.added.len(),
        result.removed.len(),
        result.modified.len()
    );
    Ok(result)
}

/// Structural comparison only: path sets, kinds, sizes and link targets. Content is left to [`diff`].
pub fn compare_snapshots(source: &Snapshot, store: &Snapshot) -> DiffResult {
    let mut result = DiffResult::default();
    for (rel, kind) in source {
        match store.get(rel) {
            None => result.added.push(rel.clone()),
            Some(other) if !kind.same_kind(other) => result.modified.push(rel.clone()),
            Some(other) => {
                let differs = match (kind, other) {
                    (NodeKind::File { size: a }, NodeKind::File { size: b }) => a != b,
                    (NodeKind::Symlink { target: a }, NodeKind::Symlink { target: b }) => a != b,
                    _ => false,
                };
                if differs {
                    result.modified.push(rel.clone());
                }
            }
        }
    }
    result.removed = store
        .keys()
        .filter(|rel| !source.contains_key(*rel))
        .cloned()
        .collect();
    result
}

fn join_rel(root: &Path, rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}
