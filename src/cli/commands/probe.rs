//! Probe command implementation.

use std::io::Write;

use crate::cli::args::ProbeArgs;
use crate::error::{Result, ToolrigError};
use crate::probe::CommandProbe;
use crate::resolve::probe_version;
use crate::toolchain::Toolchain;

use super::dispatcher::{Command, CommandResult};

/// The probe command implementation.
pub struct ProbeCommand<'a> {
    toolchain: &'a Toolchain,
    args: ProbeArgs,
}

impl<'a> ProbeCommand<'a> {
    /// Create a new probe command.
    pub fn new(toolchain: &'a Toolchain, args: ProbeArgs) -> Self {
        Self { toolchain, args }
    }
}

impl Command for ProbeCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let program = self
            .toolchain
            .search_path()
            .which(&self.args.program)
            .ok_or_else(|| ToolrigError::ToolNotFound {
                tool: self.args.program.clone(),
                versions: Vec::new(),
                attempted: vec![self.args.program.clone()],
            })?;

        let version = probe_version(&CommandProbe::new(self.args.grammar), &program)?;
        writeln!(out, "{}\t{}\t{}", program.display(), version.token(), version)?;
        Ok(CommandResult::success())
    }
}
