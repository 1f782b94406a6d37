//! Library manifests and library argument rewriting.
//!
//! A test suite directory may contain a `libs` file whose first line lists
//! whitespace-separated library tokens the suite links against.

use crate::libs::alias::LibraryAliasResolver;
use crate::libs::subst::Substitutions;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// File name of a library manifest.
pub const LIBS_FILE: &str = "libs";

/// Argument prefix carrying colon-separated library tokens.
pub const LIBRARIES_KEY: &str = "-Dpolyglot.llvm.libraries";

/// Read the tokens on the first line of a manifest.
pub fn read_libs_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .with_context(|| format!("Failed to read {:?}", path))?;
    Ok(first.split_whitespace().map(str::to_string).collect())
}

/// Manifests directly below the subdirectories of `root`, sorted by path.
pub fn manifest_files(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("*").join(LIBS_FILE);
    let pattern = pattern.to_string_lossy();
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid manifest pattern {}", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Collect the library tokens of every manifest under `root`, expanding
/// substitution tokens.
pub fn collect_dependencies(root: &Path, subst: &Substitutions<'_>) -> Result<Vec<String>> {
    let mut libs = Vec::new();
    for manifest in manifest_files(root)? {
        tracing::debug!("reading {}", manifest.display());
        libs.extend(
            read_libs_file(&manifest)?
                .iter()
                .map(|token| subst.substitute(token)),
        );
    }
    Ok(libs)
}

/// Split `args` into the colon-separated values of every `key=...` argument
/// and the remaining arguments.
pub fn extract_arg_values(args: &[String], key: &str) -> (Vec<String>, Vec<String>) {
    let prefix = format!("{}=", key);
    let mut values = Vec::new();
    let mut rest = Vec::new();
    for arg in args {
        match arg.strip_prefix(&prefix) {
            Some(list) => values.extend(list.split(':').map(str::to_string)),
            None => rest.push(arg.clone()),
        }
    }
    (values, rest)
}

/// Rewrite library arguments through alias rules.
///
/// Every `key=a:b:c` argument is removed; the resolved tokens of all of them
/// are appended as one `key=...` argument. Without any such argument `args`
/// is returned unchanged.
pub fn substitute_library_args(
    args: &[String],
    key: &str,
    resolver: &LibraryAliasResolver,
    subst: &Substitutions<'_>,
) -> Vec<String> {
    let (values, mut rest) = extract_arg_values(args, key);
    if values.is_empty() {
        return args.to_vec();
    }

    let resolved: Vec<String> = values
        .iter()
        .map(|token| resolver.resolve_with(token, subst))
        .collect();
    rest.push(format!("{}={}", key, resolved.join(":")));
    rest
}
