//! Configuration loading for toolrig.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Environment overrides in [`env`]
//!
//! # Example
//!
//! ```
//! use toolrig::config::{load_config, NameTrust};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".toolrig");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "name_trust: warn").unwrap();
//!
//! let config = load_config(temp.path(), Some(&dir.join("config.yml"))).unwrap();
//! assert_eq!(config.name_trust, NameTrust::Warn);
//! ```
//!
//! # Configuration File Locations
//!
//! Discovered files are merged in this order:
//! 1. User global config (`~/.toolrig/config.yml`)
//! 2. Project config (`.toolrig/config.yml`)
//! 3. Local overrides (`.toolrig/config.local.yml`)

pub mod env;
pub mod loader;
pub mod merger;
pub mod schema;

pub use crate::resolve::NameTrust;
pub use env::EnvOverrides;
pub use loader::{
    load_config, load_config_file, load_config_value, load_merged, parse_config, ConfigPaths,
    CONFIG_DIR,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    ToolrigConfig, DEFAULT_GCC_VERSIONS, DEFAULT_LLVM_VERSIONS, DRAGONEGG_LLVM_VERSIONS,
};
