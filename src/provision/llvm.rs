//! Prebuilt clang+llvm binaries.

use crate::error::{Result, ToolrigError};
use crate::provision::descriptor::ArchiveDescriptor;
use std::fmt;
use std::path::Path;

/// Mirror hosting the prebuilt archives.
pub const LLVM_BINARIES_BASE: &str = "https://lafo.ssw.uni-linz.ac.at/pub/sulong-deps";

/// Cache subdirectory the binaries are installed into.
pub const LLVM_CACHE_SUBDIR: &str = "tools/llvm";

/// Host platform as far as binary selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    LinuxX86_64,
    LinuxX86,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn from_parts(os: &str, arch: &str) -> Self {
        match (os, arch) {
            ("linux", "x86_64") => Self::LinuxX86_64,
            ("linux", _) => Self::LinuxX86,
            ("macos", _) => Self::MacOs,
            ("windows", _) => Self::Windows,
            _ => Self::Other,
        }
    }

    /// Archive file name for this platform, if one is published.
    pub fn llvm_archive(self) -> Option<&'static str> {
        match self {
            Self::LinuxX86_64 => Some("clang+llvm-3.2-x86_64-linux-ubuntu-12.04.tar.gz"),
            Self::LinuxX86 => Some("clang+llvm-3.2-x86-linux-ubuntu-12.04.tar.gz"),
            Self::MacOs => Some("clang+llvm-3.2-x86_64-apple-darwin11.tar.gz"),
            Self::Windows => Some("clang+llvm-3.2-x86-mingw32-EXPERIMENTAL.tar.gz"),
            Self::Other => None,
        }
    }

    /// File extension of shared libraries.
    pub fn shared_lib_ext(self) -> &'static str {
        match self {
            Self::MacOs => "dylib",
            Self::Windows => "dll",
            _ => "so",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LinuxX86_64 => "linux-x86_64",
            Self::LinuxX86 => "linux-x86",
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Other => "unknown",
        };
        f.write_str(name)
    }
}

/// Descriptor installing the prebuilt binaries under `cache_root`.
pub fn llvm_binaries(platform: Platform, cache_root: &Path) -> Result<ArchiveDescriptor> {
    let archive = platform.llvm_archive().ok_or_else(|| {
        ToolrigError::Other(anyhow::anyhow!(
            "no prebuilt LLVM binaries for platform {}",
            platform
        ))
    })?;

    Ok(
        ArchiveDescriptor::new(
            [format!("{}/{}", LLVM_BINARIES_BASE, archive)],
            cache_root.join(LLVM_CACHE_SUBDIR),
        )
        .strip(1),
    )
}
