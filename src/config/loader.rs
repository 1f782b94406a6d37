//! Configuration file discovery and loading.

use crate::config::merger::merge_configs;
use crate::config::schema::ToolrigConfig;
use crate::error::{Result, ToolrigError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding toolrig configuration, both in home and in a project.
pub const CONFIG_DIR: &str = ".toolrig";

/// Paths to configuration files in merge order (later overrides earlier).
///
/// 1. User global config (`~/.toolrig/config.yml`)
/// 2. Project config (`.toolrig/config.yml`)
/// 3. Local overrides (`.toolrig/config.local.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub user_global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub project_local: Option<PathBuf>,
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: dirs::home_dir()
                .and_then(|home| existing(home.join(CONFIG_DIR).join("config.yml"))),
            ..Self::discover_project(project_root)
        }
    }

    /// Discover only the project-level files.
    pub fn discover_project(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            user_global: None,
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// All existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolrigError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ToolrigError::Io(e)
        }
    })
}

fn parse_value(content: &str, source_path: &Path) -> Result<serde_yaml::Value> {
    serde_yaml::from_str(content).map_err(|e| ToolrigError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn into_config(values: &[serde_yaml::Value], source_path: &Path) -> Result<ToolrigConfig> {
    serde_yaml::from_value(merge_configs(values)).map_err(|e| ToolrigError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML content into a config. An empty document gives the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ToolrigConfig> {
    into_config(&[parse_value(content, source_path)?], source_path)
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<ToolrigConfig> {
    parse_config(&read(path)?, path)
}

/// Load a config file as a raw YAML value for merging.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    parse_value(&read(path)?, path)
}

/// Load and merge the discovered config files. No files at all is fine.
pub fn load_merged(paths: &ConfigPaths) -> Result<ToolrigConfig> {
    let mut values = Vec::new();
    let mut last = PathBuf::from(CONFIG_DIR);
    for path in paths.all_existing() {
        tracing::debug!("loading config {}", path.display());
        values.push(load_config_value(path)?);
        last = path.clone();
    }
    into_config(&values, &last)
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<ToolrigConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged(&ConfigPaths::discover(project_root)),
    }
}
