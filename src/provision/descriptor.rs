//! Archive descriptors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where an archive comes from and how it lands on disk.
///
/// Descriptors are plain configuration and are never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDescriptor {
    /// Candidate URLs; the first successful download wins.
    pub urls: Vec<String>,

    /// Destination directory. Relative paths are resolved by the caller; the
    /// provisioner falls back to the cache root.
    pub destination: PathBuf,

    /// Skip provisioning when this path exists. Relative to the destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_if: Option<PathBuf>,

    /// Only extract members whose path starts with one of these prefixes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrict: Vec<String>,

    /// Leading path components removed from extracted members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_levels: Option<usize>,

    /// Expected SHA-256 of the archive, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ArchiveDescriptor {
    /// Create a descriptor with no restriction, stripping or checksum.
    pub fn new<I, S>(urls: I, destination: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            destination: destination.into(),
            present_if: None,
            restrict: Vec::new(),
            strip_levels: None,
            sha256: None,
        }
    }

    /// Restrict extraction to members under `prefixes`.
    pub fn restrict_to<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restrict = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Strip `levels` leading path components.
    pub fn strip(mut self, levels: usize) -> Self {
        self.strip_levels = Some(levels);
        self
    }

    /// Treat the archive as installed once `marker` exists.
    pub fn present_if(mut self, marker: impl Into<PathBuf>) -> Self {
        self.present_if = Some(marker.into());
        self
    }

    /// The same descriptor with a relative destination joined onto `base`.
    pub fn rooted_at(&self, base: &Path) -> Self {
        Self {
            destination: base.join(&self.destination),
            ..self.clone()
        }
    }

    /// Require the archive to hash to `sha256`.
    pub fn with_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.sha256 = Some(sha256.into());
        self
    }

    /// File name the archive is cached under: the basename of the first URL.
    pub fn local_name(&self) -> Option<String> {
        let url = self.urls.first()?;
        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let name = without_query.trim_end_matches('/').rsplit('/').next()?;
        (!name.is_empty()).then(|| name.to_string())
    }
}
