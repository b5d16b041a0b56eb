//! Store index: the name → source path table, guarded by one read/write lock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::GartResult;
use crate::types::DotfileEntry;
use crate::utils::gart_toml::{load_gart_toml, save_gart_toml};

/// Registered dotfiles. Every accessor takes the lock internally; callers never hold a guard.
#[derive(Debug, Default)]
pub struct StoreIndex {
    entries: RwLock<BTreeMap<String, PathBuf>>,
}

impl StoreIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(
                map.into_iter()
                    .map(|(name, path)| (name, PathBuf::from(path)))
                    .collect(),
            ),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, PathBuf>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, PathBuf>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, name: &str) -> Option<PathBuf> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Register or overwrite `name`. Returns the previous path, if any.
    pub fn insert(&self, name: &str, source_path: &Path) -> Option<PathBuf> {
        self.write()
            .insert(name.to_string(), source_path.to_path_buf())
    }

    pub fn remove(&self, name: &str) -> Option<PathBuf> {
        self.write().remove(name)
    }

    /// Snapshot of all entries, sorted by name.
    pub fn entries(&self) -> Vec<DotfileEntry> {
        self.read()
            .iter()
            .map(|(name, path)| DotfileEntry {
                name: name.clone(),
                source_path: path.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.read()
            .iter()
            .map(|(name, path)| (name.clone(), path.to_string_lossy().into_owned()))
            .collect()
    }

    /// Load the `[dotfiles]` table of `config_path`. Missing file → empty index.
    pub fn load(config_path: &Path) -> GartResult<Self> {
        let file = load_gart_toml(config_path)?;
        Ok(Self::from_map(file.dotfiles))
    }

    /// Replace the `[dotfiles]` table of `config_path`, keeping its other sections.
    pub fn save(&self, config_path: &Path) -> GartResult<()> {
        let mut file = load_gart_toml(config_path)?;
        file.dotfiles = self.to_map();
        save_gart_toml(config_path, &file)
    }
}
