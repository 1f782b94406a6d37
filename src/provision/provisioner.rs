//! Download, extract and install an archive.

use crate::error::{Result, ToolrigError};
use crate::provision::cache::CacheDirectory;
use crate::provision::descriptor::ArchiveDescriptor;
use crate::provision::download::{download, Fetch};
use crate::provision::extract::extract_archive;
use crate::provision::merge::{count_files, merge_tree, MergeStats};
use crate::provision::strip::strip_levels;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Checksum sidecars removed together with a downloaded archive.
const SIDECAR_EXTENSIONS: &[&str] = &["sha256", "sha1"];

/// What a provisioning run did to its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub destination: PathBuf,
    pub created: usize,
    pub overwritten: usize,
    pub skipped: usize,
    /// Nothing was downloaded because the descriptor's marker already exists.
    pub already_present: bool,
}

impl ProvisionReport {
    fn new(destination: PathBuf, stats: MergeStats) -> Self {
        Self {
            destination,
            created: stats.created,
            overwritten: stats.overwritten,
            skipped: stats.skipped,
            already_present: false,
        }
    }

    fn present(destination: PathBuf) -> Self {
        Self {
            already_present: true,
            ..Self::new(destination, MergeStats::default())
        }
    }
}

/// Installs archives into destinations, staging inside the cache root.
pub struct Provisioner<'a> {
    cache: &'a CacheDirectory,
    fetcher: &'a dyn Fetch,
}

impl<'a> Provisioner<'a> {
    pub fn new(cache: &'a CacheDirectory, fetcher: &'a dyn Fetch) -> Self {
        Self { cache, fetcher }
    }

    /// Absolute destination for a descriptor.
    pub fn destination(&self, descriptor: &ArchiveDescriptor) -> PathBuf {
        if descriptor.destination.is_absolute() {
            descriptor.destination.clone()
        } else {
            self.cache.path(&descriptor.destination)
        }
    }

    /// Provision `descriptor`.
    ///
    /// Returns without downloading when the descriptor's `present_if` marker
    /// exists. On failure the destination is untouched unless the merge itself
    /// was interrupted; the staging directory is always removed.
    pub fn provision(&self, descriptor: &ArchiveDescriptor) -> Result<ProvisionReport> {
        let destination = self.destination(descriptor);
        if let Some(marker) = &descriptor.present_if {
            let marker = destination.join(marker);
            if marker.exists() {
                tracing::info!(
                    "{} already present, skipping download",
                    marker.display()
                );
                return Ok(ProvisionReport::present(destination));
            }
            tracing::debug!("{} missing, provisioning", marker.display());
        }

        let name = descriptor
            .local_name()
            .ok_or_else(|| ToolrigError::Download {
                urls: descriptor.urls.clone(),
                message: "cannot derive an archive name from the first URL".to_string(),
            })?;

        self.cache.ensure()?;
        let archive = self.cache.path(&name);
        download(self.fetcher, &descriptor.urls, &archive)?;

        if let Some(expected) = &descriptor.sha256 {
            verify_sha256(&archive, expected)?;
        }

        let report = self.install(&archive, descriptor, &destination)?;

        remove_archive(&archive)?;
        tracing::info!(
            "provisioned {} ({} created, {} overwritten, {} skipped)",
            destination.display(),
            report.created,
            report.overwritten,
            report.skipped
        );
        Ok(report)
    }

    fn install(
        &self,
        archive: &Path,
        descriptor: &ArchiveDescriptor,
        destination: &Path,
    ) -> Result<ProvisionReport> {
        let extraction_error = |message: String| ToolrigError::Extraction {
            archive: archive.to_path_buf(),
            message,
        };

        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(self.cache.root())?;
        let tree = staging.path().join("tree");
        fs::create_dir_all(&tree)?;

        let extracted = extract_archive(archive, &tree, &descriptor.restrict)
            .map_err(|e| extraction_error(format!("{:#}", e)))?;

        if let (Some(levels), Some(first)) = (descriptor.strip_levels, &extracted.first_member) {
            strip_levels(&tree, first, &descriptor.restrict, levels)
                .map_err(|e| extraction_error(format!("strip failed: {}", e)))?;
        }

        if !destination.exists() {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            let created = count_files(&tree)?;
            match fs::rename(&tree, destination) {
                Ok(()) => {
                    tracing::debug!("moved staged tree to {}", destination.display());
                    return Ok(ProvisionReport::new(
                        destination.to_path_buf(),
                        MergeStats {
                            created,
                            ..MergeStats::default()
                        },
                    ));
                }
                Err(e) => {
                    tracing::debug!("rename into place failed ({}), merging instead", e);
                }
            }
        }

        let stats = merge_tree(&tree, destination)?;
        Ok(ProvisionReport::new(destination.to_path_buf(), stats))
    }
}

/// Check that `archive` hashes to `expected` (hex, case-insensitive).
pub fn verify_sha256(archive: &Path, expected: &str) -> Result<()> {
    let mut file = File::open(archive)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let actual = hex::encode(hasher.finalize());
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(ToolrigError::Extraction {
            archive: archive.to_path_buf(),
            message: format!("sha256 mismatch: expected {}, got {}", expected, actual),
        })
    }
}

fn remove_archive(archive: &Path) -> Result<()> {
    fs::remove_file(archive)?;
    for ext in SIDECAR_EXTENSIONS {
        let mut sidecar = archive.as_os_str().to_owned();
        sidecar.push(".");
        sidecar.push(ext);
        let sidecar = PathBuf::from(sidecar);
        if sidecar.exists() {
            fs::remove_file(&sidecar)?;
        }
    }
    Ok(())
}
