//! Library alias resolution and manifest handling.
//!
//! # Modules
//!
//! - [`alias`] - Regex rules rewriting library tokens into templates
//! - [`subst`] - `<name>` / `<name:arg>` substitution registry
//! - [`manifest`] - `libs` manifest files and library argument rewriting

pub mod alias;
pub mod manifest;
pub mod subst;

pub use alias::{default_aliases, AliasConfig, AliasRule, LibraryAliasResolver};
pub use manifest::{
    collect_dependencies, read_libs_file, substitute_library_args, LIBRARIES_KEY,
};
pub use subst::{parse_substitutions, Segment, Substitutions};
