//! High-level toolchain lookups.
//!
//! [`Toolchain`] combines merged configuration with captured environment
//! overrides and answers the questions build tooling actually asks: which
//! `clang` to run, which `gcc` DragonEgg needs, where a Rust library lives.

mod dragonegg;
mod rust;

use crate::config::env::{GCC_VAR, GFORTRAN_VAR, GPP_VAR};
use crate::config::{EnvOverrides, ToolrigConfig};
use crate::error::{Result, ToolrigError};
use crate::libs::{LibraryAliasResolver, Substitutions};
use crate::probe::{clang_implicit_args, CommandProbe, Probe, ToolVersion, VersionGrammar};
use crate::provision::llvm::LLVM_CACHE_SUBDIR;
use crate::provision::{
    default_cache_dir, llvm_binaries, CacheDirectory, Fetch, Platform, ProvisionReport,
    Provisioner,
};
use crate::resolve::{resolve_override, Resolution, SearchPath, ToolResolver, ToolSpec};
use std::ffi::OsStr;
use std::path::PathBuf;

/// LLVM tools every build needs.
pub const BASIC_LLVM_TOOLS: &[&str] = &["clang", "clang++", "opt", "llc", "llvm-as"];

/// Tool locator bound to one configuration and one environment snapshot.
#[derive(Debug, Clone)]
pub struct Toolchain {
    config: ToolrigConfig,
    env: EnvOverrides,
    search_path: SearchPath,
    cache: CacheDirectory,
    platform: Platform,
}

impl Toolchain {
    pub fn new(config: ToolrigConfig, env: EnvOverrides) -> Self {
        let search_path = if !config.search_path.is_empty() {
            SearchPath::new(config.search_path.iter().cloned())
        } else if let Some(path) = &env.path {
            SearchPath::parse(OsStr::new(path))
        } else {
            SearchPath::default()
        };

        let cache_root = env
            .cache_dir
            .clone()
            .or_else(|| config.cache_dir.clone())
            .unwrap_or_else(default_cache_dir);

        Self {
            config,
            env,
            search_path,
            cache: CacheDirectory::new(cache_root),
            platform: Platform::current(),
        }
    }

    /// Use `platform` instead of the detected one.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &ToolrigConfig {
        &self.config
    }

    pub fn env(&self) -> &EnvOverrides {
        &self.env
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn cache(&self) -> &CacheDirectory {
        &self.cache
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn resolver<'a>(&self, search_path: &'a SearchPath, probe: &'a dyn Probe) -> ToolResolver<'a> {
        ToolResolver::new(search_path, probe).with_name_trust(self.config.name_trust)
    }

    /// Locate an LLVM tool. `versions` defaults to the configured LLVM versions.
    pub fn find_llvm_program(&self, name: &str, versions: Option<&[String]>) -> Result<Resolution> {
        let versions = versions.unwrap_or(self.config.llvm_versions.as_slice());
        let probe = CommandProbe::new(VersionGrammar::Llvm);
        self.resolver(&self.search_path, &probe)
            .resolve(&ToolSpec::new(name, versions.iter().cloned()))
    }

    /// Like [`find_llvm_program`](Self::find_llvm_program), but missing is `None`.
    pub fn find_llvm_program_optional(
        &self,
        name: &str,
        versions: Option<&[String]>,
    ) -> Result<Option<Resolution>> {
        match self.find_llvm_program(name, versions) {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Search path for GCC tools: `$DRAGONEGG_GCC/bin` when set.
    fn gcc_search_path(&self) -> SearchPath {
        match &self.env.dragonegg_gcc {
            Some(root) => SearchPath::new([root.join("bin")]),
            None => self.search_path.clone(),
        }
    }

    /// Locate a GCC tool. `versions` defaults to the configured GCC versions.
    ///
    /// With `optional`, a missing tool is `Ok(None)` instead of an error.
    pub fn find_gcc_program(
        &self,
        name: &str,
        versions: Option<&[String]>,
        optional: bool,
    ) -> Result<Option<Resolution>> {
        let versions = versions.unwrap_or(self.config.gcc_versions.as_slice());
        let search_path = self.gcc_search_path();
        let probe = CommandProbe::new(VersionGrammar::Gcc);
        let resolver = self.resolver(&search_path, &probe);
        let spec = ToolSpec::new(name, versions.iter().cloned());
        if optional {
            resolver.resolve_optional(&spec)
        } else {
            resolver.resolve(&spec).map(Some)
        }
    }

    /// Override variable and value for compilers that have one.
    fn compiler_override(&self, name: &str) -> Option<(&'static str, Option<&str>)> {
        match name {
            "gcc" => Some((GCC_VAR, self.env.gcc.as_deref())),
            "gfortran" => Some((GFORTRAN_VAR, self.env.gfortran.as_deref())),
            "g++" => Some((GPP_VAR, self.env.gpp.as_deref())),
            _ => None,
        }
    }

    /// Locate a GCC-family tool, consulting its override variable first.
    ///
    /// `gcc`, `gfortran` and `g++` honour `TOOLRIG_GCC`, `TOOLRIG_GFORTRAN`
    /// and `TOOLRIG_GPP`. An override naming no executable is an error even
    /// when `optional` is set.
    pub fn find_compiler(
        &self,
        name: &str,
        versions: Option<&[String]>,
        optional: bool,
    ) -> Result<Option<Resolution>> {
        if let Some((var, value)) = self.compiler_override(name) {
            if let Some(found) = resolve_override(var, value, &self.search_path)? {
                return Ok(Some(found));
            }
        }
        self.find_gcc_program(name, versions, optional)
    }

    /// C compiler for DragonEgg: `TOOLRIG_GCC`, else a supported `gcc`.
    pub fn gcc(&self, optional: bool) -> Result<Option<Resolution>> {
        self.find_compiler("gcc", None, optional)
    }

    /// Fortran compiler: `TOOLRIG_GFORTRAN`, else a supported `gfortran`.
    pub fn gfortran(&self, optional: bool) -> Result<Option<Resolution>> {
        self.find_compiler("gfortran", None, optional)
    }

    /// C++ compiler: `TOOLRIG_GPP`, else a supported `g++`.
    pub fn gpp(&self, optional: bool) -> Result<Option<Resolution>> {
        self.find_compiler("g++", None, optional)
    }

    /// Version of the `clang` on the search path, if it can be determined.
    pub fn clang_version(&self) -> Option<ToolVersion> {
        let clang = self.search_path.which("clang")?;
        CommandProbe::new(VersionGrammar::Llvm).probe(&clang).ok()
    }

    /// Download the prebuilt LLVM binaries into the cache.
    pub fn pull_llvm_binaries(&self, fetcher: &dyn Fetch) -> Result<ProvisionReport> {
        let descriptor = llvm_binaries(self.platform, self.cache.root())?;
        Provisioner::new(&self.cache, fetcher).provision(&descriptor)
    }

    /// Directory the prebuilt LLVM binaries are installed into.
    pub fn cached_llvm_dir(&self) -> PathBuf {
        self.cache.path(LLVM_CACHE_SUBDIR)
    }

    /// Check that every basic LLVM tool resolves, and that rustc works when enabled.
    pub fn ensure_basic_llvm_dependencies(&self) -> Result<Vec<(String, Resolution)>> {
        let mut found = Vec::new();
        for tool in BASIC_LLVM_TOOLS {
            found.push((tool.to_string(), self.find_llvm_program(tool, None)?));
        }

        if self.env.use_rustc && !self.rust_component_available("rustc") {
            return Err(ToolrigError::ToolNotFound {
                tool: "rustc".to_string(),
                versions: Vec::new(),
                attempted: vec!["rustc".to_string()],
            });
        }
        Ok(found)
    }

    /// Alias resolver built from the configured rules.
    pub fn alias_resolver(&self) -> Result<LibraryAliasResolver> {
        Ok(LibraryAliasResolver::from_config(&self.config.aliases)?)
    }

    /// Shared-library file name for `name` on this platform.
    pub fn lib_file_name(&self, name: &str) -> String {
        match self.platform {
            Platform::Windows => format!("{}.dll", name),
            other => format!("lib{}.{}", name, other.shared_lib_ext()),
        }
    }

    /// Substitutions for library tokens.
    ///
    /// - `<path:NAME>` - configured resource directory
    /// - `<lib:NAME>` - platform shared-library file name
    /// - `<rustlib:NAME>` - library in the active Rust sysroot
    /// - `<clangImplicitArgs>` - extra arguments the local clang needs
    pub fn substitutions(&self) -> Substitutions<'_> {
        let mut subst = Substitutions::new();
        subst.register_with_arg("path", |name| {
            self.config
                .resources
                .get(name)
                .map(|p| p.display().to_string())
        });
        subst.register_with_arg("lib", |name| Some(self.lib_file_name(name)));
        subst.register_with_arg("rustlib", |name| match self.rust_library(name) {
            Ok(found) => found.map(|p| p.display().to_string()),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        });
        subst.register_no_arg("clangImplicitArgs", || {
            Some(clang_implicit_args(self.clang_version().as_ref()).join(" "))
        });
        subst
    }
}
