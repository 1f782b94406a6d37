//! Environment overrides.
//!
//! The environment is read once, at startup, into [`EnvOverrides`]. Nothing
//! else in the crate consults process environment variables.

use std::env::VarError;
use std::path::PathBuf;

pub const GCC_VAR: &str = "TOOLRIG_GCC";
pub const GFORTRAN_VAR: &str = "TOOLRIG_GFORTRAN";
pub const GPP_VAR: &str = "TOOLRIG_GPP";
pub const USE_RUSTC_VAR: &str = "TOOLRIG_USE_RUSTC";
pub const CACHE_DIR_VAR: &str = "TOOLRIG_CACHE_DIR";
pub const DRAGONEGG_VAR: &str = "DRAGONEGG";
pub const DRAGONEGG_GCC_VAR: &str = "DRAGONEGG_GCC";
pub const DRAGONEGG_LLVM_VAR: &str = "DRAGONEGG_LLVM";
pub const PATH_VAR: &str = "PATH";

/// Environment values that change how tools are located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Explicit C compiler.
    pub gcc: Option<String>,
    /// Explicit Fortran compiler.
    pub gfortran: Option<String>,
    /// Explicit C++ compiler.
    pub gpp: Option<String>,
    /// `false` only when `TOOLRIG_USE_RUSTC=false`.
    pub use_rustc: bool,
    /// DragonEgg installation directory.
    pub dragonegg: Option<PathBuf>,
    /// GCC installation DragonEgg was built against.
    pub dragonegg_gcc: Option<PathBuf>,
    /// LLVM installation matching DragonEgg.
    pub dragonegg_llvm: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub path: Option<String>,
}

impl Default for EnvOverrides {
    fn default() -> Self {
        Self {
            gcc: None,
            gfortran: None,
            gpp: None,
            use_rustc: true,
            dragonegg: None,
            dragonegg_gcc: None,
            dragonegg_llvm: None,
            cache_dir: None,
            path: None,
        }
    }
}

impl EnvOverrides {
    /// Capture overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_fn(|key: &str| std::env::var(key))
    }

    /// Capture overrides with a custom lookup function.
    ///
    /// Empty values are treated as unset.
    pub fn from_env_fn<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let get = |key: &str| env_fn(key).ok().filter(|v| !v.is_empty());

        Self {
            gcc: get(GCC_VAR),
            gfortran: get(GFORTRAN_VAR),
            gpp: get(GPP_VAR),
            use_rustc: get(USE_RUSTC_VAR).as_deref() != Some("false"),
            dragonegg: get(DRAGONEGG_VAR).map(PathBuf::from),
            dragonegg_gcc: get(DRAGONEGG_GCC_VAR).map(PathBuf::from),
            dragonegg_llvm: get(DRAGONEGG_LLVM_VAR).map(PathBuf::from),
            cache_dir: get(CACHE_DIR_VAR).map(PathBuf::from),
            path: get(PATH_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn empty_environment() {
        let env = EnvOverrides::from_env_fn(lookup(&[]));
        assert_eq!(env, EnvOverrides::default());
        assert!(env.use_rustc);
    }

    #[test]
    fn captures_overrides() {
        let env = EnvOverrides::from_env_fn(lookup(&[
            ("TOOLRIG_GCC", "gcc-4.6"),
            ("DRAGONEGG_GCC", "/opt/gcc"),
            ("TOOLRIG_CACHE_DIR", "/tmp/cache"),
            ("PATH", "/usr/bin:/bin"),
        ]));
        assert_eq!(env.gcc.as_deref(), Some("gcc-4.6"));
        assert_eq!(env.dragonegg_gcc, Some(PathBuf::from("/opt/gcc")));
        assert_eq!(env.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(env.path.as_deref(), Some("/usr/bin:/bin"));
        assert!(env.gpp.is_none());
    }

    #[test]
    fn use_rustc_only_disabled_by_false() {
        assert!(!EnvOverrides::from_env_fn(lookup(&[("TOOLRIG_USE_RUSTC", "false")])).use_rustc);
        assert!(EnvOverrides::from_env_fn(lookup(&[("TOOLRIG_USE_RUSTC", "0")])).use_rustc);
        assert!(EnvOverrides::from_env_fn(lookup(&[("TOOLRIG_USE_RUSTC", "true")])).use_rustc);
    }

    #[test]
    fn empty_values_are_unset() {
        let env = EnvOverrides::from_env_fn(lookup(&[("TOOLRIG_GPP", "")]));
        assert!(env.gpp.is_none());
    }
}
