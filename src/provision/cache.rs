//! Cache directory for provisioned tool trees.
//!
//! The cache is created on demand and never cleared implicitly. Entries are
//! top-level subdirectories (or downloaded files) keyed by name.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Get the default cache directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolrig")
}

/// A top-level entry in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Entry name (directory or file name under the root).
    pub name: String,
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Total size of all files below the entry.
    pub size_bytes: u64,
    /// Last modification time of the entry itself.
    pub modified: Option<DateTime<Utc>>,
}

/// Storage for provisioned trees.
#[derive(Debug, Clone)]
pub struct CacheDirectory {
    /// Root directory for cache.
    root: PathBuf,
}

impl CacheDirectory {
    /// Create a new cache directory handle. Nothing is created on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the cache directory exists.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create cache directory {:?}", self.root))
    }

    /// Path of a named entry, whether or not it exists.
    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    /// Delete a named entry. Returns whether anything was removed.
    ///
    /// `name` must be a single top-level entry; paths are rejected.
    pub fn delete(&self, name: &str) -> Result<bool> {
        if !is_entry_name(name) {
            anyhow::bail!("'{}' is not a cache entry name", name);
        }
        let path = self.path(name);
        let Ok(meta) = fs::symlink_metadata(&path) else {
            return Ok(false);
        };

        if meta.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        }
        .with_context(|| format!("Failed to delete cached {:?}", path))?;

        tracing::info!("deleted cached {}", path.display());
        Ok(true)
    }

    /// List all top-level entries, largest first.
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(".staging-") {
                continue;
            }
            let path = entry.path();
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            entries.push(CacheEntry {
                size_bytes: tree_size(&path),
                name,
                path,
                modified,
            });
        }

        entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes).then(a.name.cmp(&b.name)));
        Ok(entries)
    }

    /// Delete every entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let entries = self.list()?;
        let mut count = 0;
        for entry in entries {
            if self.delete(&entry.name)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Get total cache size in bytes.
    pub fn total_size(&self) -> Result<u64> {
        Ok(self.list()?.iter().map(|e| e.size_bytes).sum())
    }
}

fn is_entry_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

fn tree_size(path: &Path) -> u64 {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return 0;
    };
    if !meta.is_dir() {
        return meta.len();
    }
    fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| tree_size(&e.path()))
                .sum()
        })
        .unwrap_or(0)
}
