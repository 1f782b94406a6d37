//! DragonEgg plugin and its matching LLVM tools.

use super::Toolchain;
use crate::error::Result;
use crate::provision::Fetch;
use std::path::PathBuf;

impl Toolchain {
    /// Plugin file name on this platform, e.g. `dragonegg.so`.
    fn dragonegg_file_name(&self) -> String {
        format!("dragonegg.{}", self.platform.shared_lib_ext())
    }

    /// Path of the DragonEgg plugin.
    ///
    /// `$DRAGONEGG` is taken as given; the `$DRAGONEGG_GCC/lib` fallback is
    /// only returned if the file exists.
    pub fn dragonegg_plugin(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.env.dragonegg {
            return Some(dir.join(self.dragonegg_file_name()));
        }
        let candidate = self
            .env
            .dragonegg_gcc
            .as_ref()?
            .join("lib")
            .join(self.dragonegg_file_name());
        candidate.exists().then_some(candidate)
    }

    /// An LLVM tool whose version matches DragonEgg's output.
    ///
    /// Tries an installed tool first, then `$DRAGONEGG_LLVM/bin`, and finally
    /// the prebuilt binaries in the cache, downloading them if absent.
    pub fn llvm_program_for_dragonegg(&self, name: &str, fetcher: &dyn Fetch) -> Result<PathBuf> {
        let versions = self.config.dragonegg_llvm_versions.as_slice();
        if let Some(found) = self.find_llvm_program_optional(name, Some(versions))? {
            return Ok(found.path);
        }

        if let Some(root) = &self.env.dragonegg_llvm {
            return Ok(root.join("bin").join(name));
        }

        let llvm_dir = self.cached_llvm_dir();
        if !llvm_dir.join("bin").join("clang").exists() {
            tracing::info!("no installed LLVM matches DragonEgg, fetching prebuilt binaries");
            self.pull_llvm_binaries(fetcher)?;
        }
        Ok(llvm_dir.join("bin").join(name))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::config::{EnvOverrides, ToolrigConfig};
    use crate::probe::test_support::fake_tool;
    use crate::provision::{Fetch, Platform};
    use crate::toolchain::Toolchain;
    use std::cell::Cell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct NoFetch {
        calls: Cell<usize>,
    }

    impl Fetch for NoFetch {
        fn fetch(&self, url: &str, _dest: &Path) -> anyhow::Result<()> {
            self.calls.set(self.calls.get() + 1);
            anyhow::bail!("offline: {}", url)
        }
    }

    fn toolchain(temp: &TempDir, env: EnvOverrides) -> Toolchain {
        let config = ToolrigConfig {
            search_path: vec![temp.path().join("bin")],
            cache_dir: Some(temp.path().join("cache")),
            ..ToolrigConfig::default()
        };
        Toolchain::new(config, env).with_platform(Platform::LinuxX86_64)
    }

    #[test]
    fn plugin_from_dragonegg_dir() {
        let temp = TempDir::new().unwrap();
        let env = EnvOverrides {
            dragonegg: Some(PathBuf::from("/opt/dragonegg")),
            ..EnvOverrides::default()
        };
        assert_eq!(
            toolchain(&temp, env).dragonegg_plugin(),
            Some(PathBuf::from("/opt/dragonegg/dragonegg.so"))
        );
    }

    #[test]
    fn plugin_from_dragonegg_gcc_only_if_present() {
        let temp = TempDir::new().unwrap();
        let gcc_root = temp.path().join("gcc");
        let env = EnvOverrides {
            dragonegg_gcc: Some(gcc_root.clone()),
            ..EnvOverrides::default()
        };
        let tc = toolchain(&temp, env);
        assert!(tc.dragonegg_plugin().is_none());

        fs::create_dir_all(gcc_root.join("lib")).unwrap();
        fs::write(gcc_root.join("lib/dragonegg.so"), "").unwrap();
        assert_eq!(tc.dragonegg_plugin(), Some(gcc_root.join("lib/dragonegg.so")));
    }

    #[test]
    fn installed_llvm_for_dragonegg() {
        let temp = TempDir::new().unwrap();
        fake_tool(&temp.path().join("bin/opt-3.3"), "LLVM version 3.3", 0);
        fake_tool(&temp.path().join("bin/opt"), "LLVM version 6.0.0", 0);

        let fetch = NoFetch { calls: Cell::new(0) };
        let tc = toolchain(&temp, EnvOverrides::default());
        let opt = tc.llvm_program_for_dragonegg("opt", &fetch).unwrap();
        assert_eq!(opt, temp.path().join("bin/opt-3.3"));
        assert_eq!(fetch.calls.get(), 0);
    }

    #[test]
    fn dragonegg_llvm_env_is_used() {
        let temp = TempDir::new().unwrap();
        let env = EnvOverrides {
            dragonegg_llvm: Some(PathBuf::from("/opt/llvm-3.2")),
            ..EnvOverrides::default()
        };
        let fetch = NoFetch { calls: Cell::new(0) };
        let opt = toolchain(&temp, env)
            .llvm_program_for_dragonegg("opt", &fetch)
            .unwrap();
        assert_eq!(opt, PathBuf::from("/opt/llvm-3.2/bin/opt"));
    }

    #[test]
    fn cached_binaries_skip_download() {
        let temp = TempDir::new().unwrap();
        let tc = toolchain(&temp, EnvOverrides::default());
        fake_tool(&tc.cached_llvm_dir().join("bin/clang"), "clang version 3.2", 0);

        let fetch = NoFetch { calls: Cell::new(0) };
        let llc = tc.llvm_program_for_dragonegg("llc", &fetch).unwrap();
        assert_eq!(llc, tc.cached_llvm_dir().join("bin/llc"));
        assert_eq!(fetch.calls.get(), 0);
    }

    #[test]
    fn missing_binaries_trigger_download() {
        let temp = TempDir::new().unwrap();
        let tc = toolchain(&temp, EnvOverrides::default());

        let fetch = NoFetch { calls: Cell::new(0) };
        assert!(tc.llvm_program_for_dragonegg("llc", &fetch).is_err());
        assert_eq!(fetch.calls.get(), 1);
    }
}
