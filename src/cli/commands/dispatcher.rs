//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, EnvOverrides};
use crate::error::Result;
use crate::toolchain::Toolchain;

/// Exit code of `find --optional` when nothing matched.
pub const EXIT_NOT_FOUND: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its report to `out`.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    env: EnvOverrides,
}

impl CommandDispatcher {
    /// Create a dispatcher for the given project root and environment snapshot.
    pub fn new(project_root: PathBuf, env: EnvOverrides) -> Self {
        Self { project_root, env }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load configuration and build the toolchain every command works against.
    fn toolchain(&self, cli: &Cli) -> Result<Toolchain> {
        let config = load_config(&self.project_root, cli.config.as_deref())?;
        Ok(Toolchain::new(config, self.env.clone()))
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        let toolchain = self.toolchain(cli)?;
        match &cli.command {
            Commands::Find(args) => {
                super::find::FindCommand::new(&toolchain, args.clone()).execute(out)
            }
            Commands::Probe(args) => {
                super::probe::ProbeCommand::new(&toolchain, args.clone()).execute(out)
            }
            Commands::Provision(args) => {
                super::provision::ProvisionCommand::named(
                    &toolchain,
                    &self.project_root,
                    args.clone(),
                )
                .execute(out)
            }
            Commands::ProvisionUrl(args) => super::provision::ProvisionCommand::from_urls(
                &toolchain,
                &self.project_root,
                args.clone(),
            )
            .execute(out),
            Commands::PullLlvm => super::provision::ProvisionCommand::llvm(&toolchain).execute(out),
            Commands::Libs(args) => {
                super::libs::LibsCommand::new(&toolchain, args.clone()).execute(out)
            }
            Commands::Cache(args) => {
                super::cache::CacheCommand::new(toolchain.cache(), args.clone()).execute(out)
            }
        }
    }
}
