//! Version probing for candidate executables.
//!
//! A probe runs `<program> --version`, captures everything the program
//! prints, and extracts a [`ToolVersion`] with a [`VersionGrammar`].
//!
//! Some tools (older `opt` builds, for one) exit non-zero on a successful
//! version query, so the exit status is ignored and the captured output is
//! always parsed.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use toolrig::probe::{CommandProbe, Probe, VersionGrammar};
//!
//! let probe = CommandProbe::new(VersionGrammar::Llvm);
//! if let Ok(version) = probe.probe(Path::new("/usr/bin/clang")) {
//!     println!("clang {}", version.token());
//! }
//! ```

pub mod version;

pub use version::{clang_implicit_args, Product, ToolVersion, VersionGrammar};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Argument passed to request a version banner.
pub const VERSION_FLAG: &str = "--version";

/// Why a probe produced no version.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but printed nothing the grammar recognizes.
    #[error("no version found in output of {program}")]
    Unparseable { program: PathBuf, output: String },
}

/// Something that can report the version of an executable.
pub trait Probe {
    /// Determine the version of the executable at `program`.
    fn probe(&self, program: &Path) -> Result<ToolVersion, ProbeError>;
}

/// Probe that executes the program with [`VERSION_FLAG`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandProbe {
    grammar: VersionGrammar,
}

impl CommandProbe {
    /// Create a probe parsing output with `grammar`.
    pub fn new(grammar: VersionGrammar) -> Self {
        Self { grammar }
    }

    /// The grammar this probe parses with.
    pub fn grammar(&self) -> VersionGrammar {
        self.grammar
    }
}

impl Probe for CommandProbe {
    fn probe(&self, program: &Path) -> Result<ToolVersion, ProbeError> {
        let output = version_output(program)?;
        tracing::debug!("{} {} -> {:?}", program.display(), VERSION_FLAG, output.trim());
        self.grammar
            .parse(&output)
            .ok_or_else(|| ProbeError::Unparseable {
                program: program.to_path_buf(),
                output,
            })
    }
}

/// Run `program --version` and return stdout followed by stderr.
///
/// The exit status is deliberately not inspected.
pub fn version_output(program: &Path) -> Result<String, ProbeError> {
    let output = Command::new(program)
        .arg(VERSION_FLAG)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ProbeError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}
