//! Configuration schema.

use crate::libs::alias::{default_aliases, AliasConfig};
use crate::provision::descriptor::ArchiveDescriptor;
use crate::resolve::NameTrust;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// LLVM versions accepted by default, most preferred first.
pub const DEFAULT_LLVM_VERSIONS: &[&str] = &["3.2", "3.3", "3.8", "3.9", "4.0", "5.0", "6.0"];

/// GCC versions accepted by default, most preferred first.
pub const DEFAULT_GCC_VERSIONS: &[&str] = &["4.6", "4.5", "4.7"];

/// LLVM versions the DragonEgg plugin can emit IR for.
pub const DRAGONEGG_LLVM_VERSIONS: &[&str] = &["3.2", "3.3"];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Root configuration, merged from every discovered config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolrigConfig {
    /// Cache root for provisioned trees. Defaults to the platform cache directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Directories searched for executables. Empty means `PATH`.
    pub search_path: Vec<PathBuf>,

    /// Accepted LLVM versions in preference order.
    pub llvm_versions: Vec<String>,

    /// Accepted GCC versions in preference order.
    pub gcc_versions: Vec<String>,

    /// LLVM versions usable with DragonEgg.
    pub dragonegg_llvm_versions: Vec<String>,

    /// How much a version-suffixed file name is trusted.
    pub name_trust: NameTrust,

    /// Named directories available as `<path:NAME>`.
    pub resources: BTreeMap<String, PathBuf>,

    /// Library alias rules, tried in order.
    pub aliases: Vec<AliasConfig>,

    /// Named archives that can be provisioned.
    pub archives: BTreeMap<String, ArchiveDescriptor>,
}

impl Default for ToolrigConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            search_path: Vec::new(),
            llvm_versions: strings(DEFAULT_LLVM_VERSIONS),
            gcc_versions: strings(DEFAULT_GCC_VERSIONS),
            dragonegg_llvm_versions: strings(DRAGONEGG_LLVM_VERSIONS),
            name_trust: NameTrust::default(),
            resources: BTreeMap::new(),
            aliases: default_aliases(),
            archives: BTreeMap::new(),
        }
    }
}
