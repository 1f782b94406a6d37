//! Merging a staged tree into a destination.
//!
//! Files are written only when the destination copy is missing or older than
//! the source by more than [`MTIME_TOLERANCE`]. Modification times travel with
//! the copy, so merging the same tree twice writes nothing the second time.

use filetime::FileTime;
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Slack allowed between source and destination mtimes.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

/// Counts of what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub created: usize,
    pub overwritten: usize,
    pub skipped: usize,
}

impl MergeStats {
    /// Add another merge's counts to this one.
    pub fn absorb(&mut self, other: MergeStats) {
        self.created += other.created;
        self.overwritten += other.overwritten;
        self.skipped += other.skipped;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Create,
    Overwrite,
    Skip,
}

fn decide(source: &Metadata, dest: &Path) -> io::Result<Decision> {
    let Ok(existing) = fs::symlink_metadata(dest) else {
        return Ok(Decision::Create);
    };
    if is_newer(source.modified()?, existing.modified()?) {
        Ok(Decision::Overwrite)
    } else {
        Ok(Decision::Skip)
    }
}

/// Whether `source` is newer than `dest` by more than the tolerance.
pub fn is_newer(source: SystemTime, dest: SystemTime) -> bool {
    source
        .duration_since(dest)
        .is_ok_and(|ahead| ahead > MTIME_TOLERANCE)
}

/// Merge everything under `src` into `dst`, creating `dst` as needed.
pub fn merge_tree(src: &Path, dst: &Path) -> io::Result<MergeStats> {
    let mut stats = MergeStats::default();
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let meta = fs::symlink_metadata(&from)?;

        if meta.is_dir() {
            stats.absorb(merge_tree(&from, &to)?);
            continue;
        }

        let decision = decide(&meta, &to)?;
        tracing::debug!("{:?} {}", decision, to.display());
        match decision {
            Decision::Skip => stats.skipped += 1,
            Decision::Create => {
                place(&from, &to, &meta)?;
                stats.created += 1;
            }
            Decision::Overwrite => {
                place(&from, &to, &meta)?;
                stats.overwritten += 1;
            }
        }
    }

    Ok(stats)
}

/// Copy `from` next to `to` under a temporary name, then rename it into place.
fn place(from: &Path, to: &Path, meta: &Metadata) -> io::Result<()> {
    let mut tmp_name = OsString::from(".");
    tmp_name.push(to.file_name().unwrap_or_default());
    tmp_name.push(".toolrig-tmp");
    let tmp = to.with_file_name(tmp_name);
    let _ = fs::remove_file(&tmp);

    if meta.file_type().is_symlink() {
        copy_symlink(from, &tmp)?;
    } else {
        fs::copy(from, &tmp)?;
        let mtime = FileTime::from_last_modification_time(meta);
        filetime::set_file_mtime(&tmp, mtime)?;
    }

    fs::rename(&tmp, to)
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    std::os::unix::fs::symlink(target, to)?;
    let mtime = FileTime::from_last_modification_time(&fs::symlink_metadata(from)?);
    filetime::set_symlink_file_times(to, mtime, mtime)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

/// Number of non-directory entries below `root`.
pub fn count_files(root: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            count += count_files(&entry.path())?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}
