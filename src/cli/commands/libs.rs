//! Libs command implementation.

use std::io::Write;

use crate::cli::args::LibsArgs;
use crate::error::Result;
use crate::libs::collect_dependencies;
use crate::toolchain::Toolchain;

use super::dispatcher::{Command, CommandResult};

/// The libs command implementation.
///
/// Prints one resolved library per line: first the manifests under `--dir`,
/// then the tokens given on the command line.
pub struct LibsCommand<'a> {
    toolchain: &'a Toolchain,
    args: LibsArgs,
}

impl<'a> LibsCommand<'a> {
    /// Create a new libs command.
    pub fn new(toolchain: &'a Toolchain, args: LibsArgs) -> Self {
        Self { toolchain, args }
    }
}

impl Command for LibsCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let resolver = self.toolchain.alias_resolver()?;
        let subst = self.toolchain.substitutions();

        let mut tokens = Vec::new();
        if let Some(dir) = &self.args.dir {
            tokens.extend(collect_dependencies(dir, &subst)?);
        }
        tokens.extend(self.args.tokens.iter().cloned());

        for token in &tokens {
            writeln!(out, "{}", resolver.resolve_with(token, &subst))?;
        }
        Ok(CommandResult::success())
    }
}
