//! Find command implementation.

use std::io::Write;

use crate::cli::args::FindArgs;
use crate::error::Result;
use crate::probe::{CommandProbe, VersionGrammar};
use crate::resolve::Resolution;
use crate::toolchain::Toolchain;

use super::dispatcher::{Command, CommandResult, EXIT_NOT_FOUND};

/// The find command implementation.
pub struct FindCommand<'a> {
    toolchain: &'a Toolchain,
    args: FindArgs,
}

impl<'a> FindCommand<'a> {
    /// Create a new find command.
    pub fn new(toolchain: &'a Toolchain, args: FindArgs) -> Self {
        Self { toolchain, args }
    }

    /// Versions from the command line, if any were given.
    fn explicit_versions(&self) -> Option<&[String]> {
        (!self.args.versions.is_empty()).then_some(self.args.versions.as_slice())
    }

    /// Locate the tool. `None` means an optional tool was not found.
    ///
    /// The gcc grammar goes through the toolchain so compiler overrides and
    /// `$DRAGONEGG_GCC/bin` apply.
    fn locate(&self) -> Result<Option<Resolution>> {
        let tool = &self.args.tool;
        let optional = self.args.optional;
        match self.args.grammar {
            VersionGrammar::Gcc => {
                self.toolchain
                    .find_compiler(tool, self.explicit_versions(), optional)
            }
            VersionGrammar::Llvm if optional => self
                .toolchain
                .find_llvm_program_optional(tool, self.explicit_versions()),
            VersionGrammar::Llvm => self
                .toolchain
                .find_llvm_program(tool, self.explicit_versions())
                .map(Some),
        }
    }
}

impl Command for FindCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let Some(found) = self.locate()? else {
            tracing::info!("no supported version of {} found", self.args.tool);
            return Ok(CommandResult::failure(EXIT_NOT_FOUND));
        };

        let found = if self.args.verify {
            found.verify(&CommandProbe::new(self.args.grammar))?
        } else {
            found
        };

        writeln!(out, "{}\t{}", found.path.display(), found.origin)?;
        Ok(CommandResult::success())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{EnvOverrides, ToolrigConfig};
    use crate::probe::test_support::fake_tool;
    use crate::resolve::NameTrust;
    use std::path::Path;
    use tempfile::TempDir;

    fn toolchain(bin: &Path, name_trust: NameTrust) -> Toolchain {
        let config = ToolrigConfig {
            search_path: vec![bin.to_path_buf()],
            llvm_versions: vec!["3.8".into(), "3.9".into()],
            name_trust,
            ..ToolrigConfig::default()
        };
        Toolchain::new(config, EnvOverrides::default())
    }

    fn args(tool: &str) -> FindArgs {
        FindArgs {
            tool: tool.to_string(),
            versions: Vec::new(),
            grammar: VersionGrammar::Llvm,
            optional: false,
            verify: false,
        }
    }

    fn run(tc: &Toolchain, args: FindArgs) -> Result<(CommandResult, String)> {
        let mut out = Vec::new();
        let result = FindCommand::new(tc, args).execute(&mut out)?;
        Ok((result, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn prints_verified_tool() {
        let temp = TempDir::new().unwrap();
        fake_tool(&temp.path().join("clang"), "clang version 3.9.1 (tags/RELEASE_391)", 0);

        let tc = toolchain(temp.path(), NameTrust::Trust);
        let (result, output) = run(&tc, args("clang")).unwrap();
        assert!(result.success);
        assert!(output.contains("verified 3.9.1"));
    }

    #[test]
    fn command_line_versions_override_config() {
        let temp = TempDir::new().unwrap();
        fake_tool(&temp.path().join("clang"), "clang version 3.9.1", 0);
        fake_tool(&temp.path().join("clang-6.0"), "clang version 6.0.0", 0);

        let tc = toolchain(temp.path(), NameTrust::Trust);
        let mut find = args("clang");
        find.versions = vec!["6.0".into()];
        let (_, output) = run(&tc, find).unwrap();
        assert!(output.contains("clang-6.0"));
        assert!(output.contains("unverified 6.0"));
    }

    #[test]
    fn optional_miss_exits_with_two() {
        let temp = TempDir::new().unwrap();
        let tc = toolchain(temp.path(), NameTrust::Trust);
        let mut find = args("llc");
        find.optional = true;
        let (result, output) = run(&tc, find).unwrap();
        assert_eq!(result.exit_code, EXIT_NOT_FOUND);
        assert!(output.is_empty());
    }

    #[test]
    fn required_miss_is_error() {
        let temp = TempDir::new().unwrap();
        let tc = toolchain(temp.path(), NameTrust::Trust);
        let err = run(&tc, args("llc")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn verify_catches_mislabelled_executable() {
        let temp = TempDir::new().unwrap();
        fake_tool(&temp.path().join("opt-3.8"), "LLVM version 4.0.0", 0);

        let tc = toolchain(temp.path(), NameTrust::Trust);
        let mut find = args("opt");
        find.verify = true;
        assert!(run(&tc, find).is_err());
    }

    #[test]
    fn gcc_grammar_uses_gcc_versions() {
        let temp = TempDir::new().unwrap();
        fake_tool(&temp.path().join("gcc"), "gcc (GCC) 4.6.3", 0);

        let tc = toolchain(temp.path(), NameTrust::Trust);
        let mut find = args("gcc");
        find.grammar = VersionGrammar::Gcc;
        let (_, output) = run(&tc, find).unwrap();
        assert!(output.contains("verified 4.6.3"));
    }

    fn gcc_args(tool: &str) -> FindArgs {
        FindArgs {
            grammar: VersionGrammar::Gcc,
            ..args(tool)
        }
    }

    fn with_env(bin: &Path, env: EnvOverrides) -> Toolchain {
        let config = ToolrigConfig {
            search_path: vec![bin.to_path_buf()],
            ..ToolrigConfig::default()
        };
        Toolchain::new(config, env)
    }

    #[test]
    fn compiler_override_beats_search() {
        let temp = TempDir::new().unwrap();
        fake_tool(&temp.path().join("gfortran"), "GNU Fortran (GCC) 4.6.3", 0);
        fake_tool(&temp.path().join("my-gfortran"), "GNU Fortran (GCC) 4.5.1", 0);
        let env = EnvOverrides {
            gfortran: Some("my-gfortran".into()),
            ..EnvOverrides::default()
        };

        let tc = with_env(temp.path(), env);
        let (_, output) = run(&tc, gcc_args("gfortran")).unwrap();
        assert!(output.contains("my-gfortran"));
        assert!(output.contains("override from TOOLRIG_GFORTRAN"));
    }

    #[test]
    fn invalid_compiler_override_is_error_even_when_optional() {
        let temp = TempDir::new().unwrap();
        fake_tool(&temp.path().join("gcc"), "gcc (GCC) 4.6.3", 0);
        let env = EnvOverrides {
            gcc: Some("/nonexistent/gcc".into()),
            ..EnvOverrides::default()
        };

        let tc = with_env(temp.path(), env);
        let mut find = gcc_args("gcc");
        find.optional = true;
        let err = run(&tc, find).unwrap_err();
        assert!(matches!(err, crate::error::ToolrigError::Configuration { .. }));
    }

    #[test]
    fn gcc_grammar_searches_dragonegg_gcc_bin() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("gcc-install");
        fake_tool(&temp.path().join("g++"), "g++ (GCC) 4.7.2", 0);
        fake_tool(&install.join("bin/g++"), "g++ (GCC) 4.6.4", 0);
        let env = EnvOverrides {
            dragonegg_gcc: Some(install.clone()),
            ..EnvOverrides::default()
        };

        let tc = with_env(temp.path(), env);
        let (_, output) = run(&tc, gcc_args("g++")).unwrap();
        assert!(output.starts_with(&install.join("bin/g++").display().to_string()));
    }
}
