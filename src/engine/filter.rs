//! Ignore filter for bulk registration.
//!
//! Tokens are plain substrings of the candidate path, not globs. A directory whose path merely
//! contains a token (e.g. `.gitconfig.d` contains `.git`) is ignored too; that false positive is
//! a known limitation of the substring rule.

use std::path::{Path, PathBuf};

use crate::engine::paths::{clean, overlaps, resolve_path};
use crate::utils::config::IgnoreTokens;

/// Why a candidate was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Path contains this ignore token.
    Token(String),
    /// Path is inside the store root or contains it.
    StoreOverlap,
}

/// Ordered deny-list plus the store root. Built once, read-only afterwards; safe to share across workers.
#[derive(Clone, Debug)]
pub struct IgnoreFilter {
    tokens: Vec<String>,
    store_root: PathBuf,
}

impl IgnoreFilter {
    /// Built-in tokens plus `extra` (config file / CLI).
    pub fn new(store_root: &Path, extra: &[String]) -> Self {
        let mut tokens: Vec<String> = IgnoreTokens::DEFAULT.iter().map(|t| t.to_string()).collect();
        tokens.extend(extra.iter().filter(|t| !t.is_empty()).cloned());
        Self::with_tokens(store_root, tokens)
    }

    /// Exactly `tokens`, no built-ins. The store root is made absolute so overlap checks against
    /// resolved candidates hold for relative roots too.
    pub fn with_tokens(store_root: &Path, tokens: Vec<String>) -> Self {
        let store_root = resolve_path(store_root).unwrap_or_else(|_| clean(store_root));
        Self { tokens, store_root }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn store_root(&self) -> &Path {
        &self.store_root
    }

    /// First reason to skip `candidate`, or None to keep it.
    pub fn check(&self, candidate: &Path) -> Option<IgnoreReason> {
        if overlaps(candidate, &self.store_root) {
            return Some(IgnoreReason::StoreOverlap);
        }
        let path_str = candidate.to_string_lossy();
        self.tokens
            .iter()
            .find(|token| path_str.contains(token.as_str()))
            .map(|token| IgnoreReason::Token(token.clone()))
    }

    pub fn should_ignore(&self, candidate: &Path) -> bool {
        self.check(candidate).is_some()
    }
}

/// One-shot form of [`IgnoreFilter::should_ignore`] with the built-in tokens.
pub fn should_ignore(candidate: &Path, store_root: &Path) -> bool {
    IgnoreFilter::new(store_root, &[]).should_ignore(candidate)
}
