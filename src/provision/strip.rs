//! Removing leading path components from an extracted tree.

use crate::provision::merge::merge_tree;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

fn normalize_prefix(prefix: &str) -> PathBuf {
    Path::new(prefix)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

/// Move extracted content `levels` directories up inside `root`.
///
/// Without a restriction the first `levels` components of `first_member`
/// form the single prefix to lift. With a restriction every prefix is lifted
/// to its own path minus the first `levels` components. The top-level entry
/// of `first_member` is then deleted.
pub fn strip_levels(
    root: &Path,
    first_member: &Path,
    restrict: &[String],
    levels: usize,
) -> io::Result<()> {
    if levels == 0 {
        return Ok(());
    }

    let prefixes: Vec<PathBuf> = if restrict.is_empty() {
        vec![first_member.components().take(levels).collect()]
    } else {
        restrict.iter().map(|p| normalize_prefix(p)).collect()
    };

    for prefix in &prefixes {
        let from = root.join(prefix);
        if !from.is_dir() {
            tracing::debug!("nothing to strip under {}", from.display());
            continue;
        }
        let lifted: PathBuf = prefix.components().skip(levels).collect();
        let to = root.join(lifted);
        tracing::debug!("lifting {} to {}", from.display(), to.display());
        merge_tree(&from, &to)?;
    }

    if let Some(top) = first_member.components().next() {
        let top = root.join(top);
        match fs::symlink_metadata(&top) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&top)?,
            Ok(_) => fs::remove_file(&top)?,
            Err(_) => {}
        }
    }

    Ok(())
}
