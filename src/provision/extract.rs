//! Tar extraction with compression sniffing and prefix restriction.

use anyhow::{anyhow, bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// Compression wrapped around a tar stream, detected from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Xz,
    Bzip2,
    None,
}

impl Compression {
    /// Identify compression from the first bytes of a file.
    pub fn sniff(magic: &[u8]) -> Self {
        if magic.starts_with(&[0x1f, 0x8b]) {
            Self::Gzip
        } else if magic.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
            Self::Xz
        } else if magic.starts_with(b"BZh") {
            Self::Bzip2
        } else {
            Self::None
        }
    }
}

/// Outcome of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Path of the first member written, relative to the destination.
    pub first_member: Option<PathBuf>,
    /// Number of members written.
    pub members: usize,
}

/// Open `archive` and wrap it in the matching decoder.
fn open_decoder(archive: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(archive).with_context(|| format!("Failed to open {:?}", archive))?;
    let mut reader = BufReader::new(file);
    let compression = Compression::sniff(reader.fill_buf()?);
    tracing::debug!("{} compression: {:?}", archive.display(), compression);

    Ok(match compression {
        Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
        Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
        Compression::None => Box::new(reader),
    })
}

/// Drop `.` components so `./foo/bar` and `foo/bar` compare equal.
fn normalize_member(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn ensure_link_within(dest: &Path, link_parent: &Path, target: &Path) -> Result<()> {
    if target.is_absolute() {
        bail!("unsafe link target (absolute): {}", target.display());
    }
    let resolved = normalize_lexical(&link_parent.join(target));
    if !resolved.starts_with(normalize_lexical(dest)) {
        bail!(
            "unsafe link target (escapes destination): {} -> {}",
            link_parent.display(),
            target.display()
        );
    }
    Ok(())
}

/// Drop leading `./` so a prefix compares like a normalized member.
fn trim_cur_dir(mut prefix: &str) -> &str {
    while let Some(rest) = prefix.strip_prefix("./") {
        prefix = rest.trim_start_matches('/');
    }
    prefix
}

/// Whether a member passes the restriction. An empty list admits everything.
///
/// Both sides are compared without leading `./`, so `./suite/` and `suite/`
/// select the same members whichever form the archive stores.
fn admitted(member: &Path, restrict: &[String]) -> bool {
    if restrict.is_empty() {
        return true;
    }
    let name = member.to_string_lossy();
    restrict
        .iter()
        .any(|prefix| name.starts_with(trim_cur_dir(prefix)))
}

/// Extract `archive` into `dest`, keeping only members under `restrict`.
///
/// Members keep their internal structure. Absolute paths, `..` components
/// and links pointing outside `dest` abort the extraction.
pub fn extract_archive(archive: &Path, dest: &Path, restrict: &[String]) -> Result<Extracted> {
    let reader = open_decoder(archive)?;
    let mut tar = tar::Archive::new(reader);
    tar.set_preserve_mtime(true);
    tar.set_preserve_permissions(true);

    let mut extracted = Extracted::default();

    for entry in tar.entries().context("tar read error")? {
        let mut entry = entry.context("tar entry error")?;
        let raw = entry.path().context("tar path error")?.into_owned();

        if raw.is_absolute() || raw.components().any(|c| c == Component::ParentDir) {
            bail!("unsafe member path: {}", raw.display());
        }

        let member = normalize_member(&raw);
        if member.as_os_str().is_empty() || !admitted(&member, restrict) {
            continue;
        }

        let kind = entry.header().entry_type();
        if kind.is_symlink() || kind.is_hard_link() {
            let target = entry
                .link_name()
                .context("tar link name error")?
                .ok_or_else(|| anyhow!("link without target: {}", member.display()))?;
            let full = dest.join(&member);
            let parent = if kind.is_symlink() {
                full.parent().unwrap_or(dest).to_path_buf()
            } else {
                dest.to_path_buf()
            };
            ensure_link_within(dest, &parent, &target)?;
        }

        let unpacked = entry
            .unpack_in(dest)
            .with_context(|| format!("unpack error for {}", member.display()))?;
        if !unpacked {
            continue;
        }

        if extracted.first_member.is_none() {
            extracted.first_member = Some(member);
        }
        extracted.members += 1;
    }

    tracing::debug!(
        "extracted {} members from {}",
        extracted.members,
        archive.display()
    );
    Ok(extracted)
}
