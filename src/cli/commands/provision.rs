//! Provision, provision-url and pull-llvm command implementations.

use anyhow::anyhow;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::args::{ProvisionArgs, ProvisionUrlArgs};
use crate::error::{Result, ToolrigError};
use crate::provision::{ArchiveDescriptor, HttpFetcher, ProvisionReport, Provisioner};
use crate::toolchain::Toolchain;

use super::dispatcher::{Command, CommandResult};

/// What to provision.
enum Target {
    /// An entry under `archives:` in the configuration.
    Named {
        name: String,
        project_root: PathBuf,
        force: bool,
    },
    /// A descriptor assembled from command-line flags.
    Descriptor(ArchiveDescriptor),
    /// The prebuilt LLVM binaries for this platform.
    Llvm,
}

/// The provisioning command implementation.
pub struct ProvisionCommand<'a> {
    toolchain: &'a Toolchain,
    target: Target,
}

impl<'a> ProvisionCommand<'a> {
    /// Provision an archive configured under `archives:`.
    ///
    /// A relative destination is taken from `project_root`.
    pub fn named(toolchain: &'a Toolchain, project_root: &Path, args: ProvisionArgs) -> Self {
        Self {
            toolchain,
            target: Target::Named {
                name: args.archive,
                project_root: project_root.to_path_buf(),
                force: args.force,
            },
        }
    }

    /// Provision from explicit URLs. A relative `--dest` is taken from `project_root`.
    pub fn from_urls(toolchain: &'a Toolchain, project_root: &Path, args: ProvisionUrlArgs) -> Self {
        let mut descriptor =
            ArchiveDescriptor::new(args.urls, &args.dest).restrict_to(args.only);
        if let Some(levels) = args.strip {
            descriptor = descriptor.strip(levels);
        }
        if let Some(sha256) = args.sha256 {
            descriptor = descriptor.with_sha256(sha256);
        }
        Self {
            toolchain,
            target: Target::Descriptor(descriptor.rooted_at(project_root)),
        }
    }

    /// Download the prebuilt LLVM binaries into the cache.
    pub fn llvm(toolchain: &'a Toolchain) -> Self {
        Self {
            toolchain,
            target: Target::Llvm,
        }
    }

    fn descriptor(&self, name: &str) -> Result<&ArchiveDescriptor> {
        let archives = &self.toolchain.config().archives;
        archives.get(name).ok_or_else(|| {
            let known: Vec<&str> = archives.keys().map(String::as_str).collect();
            ToolrigError::Other(anyhow!(
                "No archive named '{}' in configuration (known: {})",
                name,
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            ))
        })
    }
}

impl Command for ProvisionCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let fetcher = HttpFetcher::new()?;
        let report = match &self.target {
            Target::Named {
                name,
                project_root,
                force,
            } => {
                let mut descriptor = self.descriptor(name)?.rooted_at(project_root);
                if *force {
                    descriptor.present_if = None;
                }
                Provisioner::new(self.toolchain.cache(), &fetcher).provision(&descriptor)?
            }
            Target::Descriptor(descriptor) => {
                Provisioner::new(self.toolchain.cache(), &fetcher).provision(descriptor)?
            }
            Target::Llvm => self.toolchain.pull_llvm_binaries(&fetcher)?,
        };

        print_report(&report, out)?;
        Ok(CommandResult::success())
    }
}

fn print_report(report: &ProvisionReport, out: &mut dyn Write) -> std::io::Result<()> {
    if report.already_present {
        return writeln!(out, "{} is already provisioned", report.destination.display());
    }
    writeln!(
        out,
        "Provisioned {} ({} created, {} overwritten, {} skipped)",
        report.destination.display(),
        report.created,
        report.overwritten,
        report.skipped
    )
}
