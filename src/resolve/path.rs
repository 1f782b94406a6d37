//! Executable search path handling.
//!
//! Resolves a program name against an ordered list of directories without
//! shelling out to `which`, whose behavior varies across systems.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Ordered directories searched for executables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Use exactly these directories, in order.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(|d| strip_quotes(d.into())).collect(),
        }
    }

    /// Parse a `PATH`-style value split on the platform separator.
    pub fn parse(value: &OsStr) -> Self {
        Self::new(std::env::split_paths(value))
    }

    /// The process `PATH`, or an empty search path if it is unset.
    pub fn from_env() -> Self {
        std::env::var_os("PATH")
            .map(|path| Self::parse(&path))
            .unwrap_or_default()
    }

    /// Directories in search order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Find `program`, returning the first executable match.
    ///
    /// A program that already contains a path separator is checked as-is
    /// and the directories are not consulted.
    pub fn which(&self, program: &str) -> Option<PathBuf> {
        let as_path = Path::new(program);
        if as_path.components().count() > 1 || as_path.is_absolute() {
            return is_executable(as_path).then(|| as_path.to_path_buf());
        }

        for dir in &self.dirs {
            let candidate = dir.join(program);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Entries copied from shells sometimes arrive wrapped in double quotes.
fn strip_quotes(dir: PathBuf) -> PathBuf {
    match dir.to_str() {
        Some(s) if s.starts_with('"') || s.ends_with('"') => PathBuf::from(s.trim_matches('"')),
        _ => dir,
    }
}
