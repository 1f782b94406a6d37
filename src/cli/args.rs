//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::probe::VersionGrammar;

use super::commands::cache::CacheArgs;

/// Toolrig - Locate version-matched toolchain binaries and provision archives.
#[derive(Debug, Parser)]
#[command(name = "toolrig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .toolrig/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Locate a tool matching one of the accepted versions
    Find(FindArgs),

    /// Print the version an executable reports
    Probe(ProbeArgs),

    /// Provision an archive named in the configuration
    Provision(ProvisionArgs),

    /// Provision an archive from explicit URLs
    ProvisionUrl(ProvisionUrlArgs),

    /// Download the prebuilt LLVM binaries into the cache
    PullLlvm,

    /// Resolve library tokens through the alias rules
    Libs(LibsArgs),

    /// Manage the download cache
    Cache(CacheArgs),
}

/// Arguments for the `find` command.
#[derive(Debug, Clone, clap::Args)]
pub struct FindArgs {
    /// Tool name, e.g. `clang` or `gcc`
    pub tool: String,

    /// Accepted versions in preference order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub versions: Vec<String>,

    /// Grammar used to read `--version` output
    #[arg(long, value_enum, default_value_t = VersionGrammar::Llvm)]
    pub grammar: VersionGrammar,

    /// Exit with status 2 instead of failing when nothing is found
    #[arg(long)]
    pub optional: bool,

    /// Probe a name-matched executable before reporting it
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for the `probe` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ProbeArgs {
    /// Executable path or name on the search path
    pub program: String,

    /// Grammar used to read `--version` output
    #[arg(long, value_enum, default_value_t = VersionGrammar::Llvm)]
    pub grammar: VersionGrammar,
}

/// Arguments for the `provision` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ProvisionArgs {
    /// Key under `archives:` in the configuration
    pub archive: String,

    /// Provision even when the archive's `present_if` marker exists
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `provision-url` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ProvisionUrlArgs {
    /// Candidate URL, tried in the order given
    #[arg(long = "url", required = true)]
    pub urls: Vec<String>,

    /// Destination directory (relative paths are taken from the project root)
    #[arg(long)]
    pub dest: PathBuf,

    /// Extract only members under this prefix
    #[arg(long = "only")]
    pub only: Vec<String>,

    /// Leading path components to remove
    #[arg(long)]
    pub strip: Option<usize>,

    /// Expected SHA-256 of the archive
    #[arg(long)]
    pub sha256: Option<String>,
}

/// Arguments for the `libs` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LibsArgs {
    /// Directory whose `*/libs` manifests are read
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Library tokens to resolve
    pub tokens: Vec<String>,
}
