//! Rust toolchain components and sysroot libraries.

use super::Toolchain;
use crate::error::{Result, ToolrigError};
use anyhow::{anyhow, Context};
use std::path::PathBuf;
use std::process::{Command, Stdio};

impl Toolchain {
    /// Whether `component` (e.g. `rustc`, `rustfmt`) is on the search path and
    /// answers `--version` successfully. `rustc` is reported missing when
    /// disabled through `TOOLRIG_USE_RUSTC=false`.
    pub fn rust_component_available(&self, component: &str) -> bool {
        if component == "rustc" && !self.env.use_rustc {
            return false;
        }
        let Some(path) = self.search_path.which(component) else {
            return false;
        };
        Command::new(&path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Sysroot of the active Rust toolchain, or `None` if rustc is unavailable.
    pub fn rust_sysroot(&self) -> Result<Option<PathBuf>> {
        if !self.rust_component_available("rustc") {
            return Ok(None);
        }
        let Some(rustc) = self.search_path.which("rustc") else {
            return Ok(None);
        };

        let output = Command::new(&rustc)
            .args(["--print", "sysroot"])
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", rustc.display()))?;
        if !output.status.success() {
            return Err(ToolrigError::Other(anyhow!(
                "{} --print sysroot exited with {}",
                rustc.display(),
                output.status
            )));
        }

        let sysroot = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(PathBuf::from(sysroot)))
    }

    /// Shared library `lib<name>-<hash>` in the Rust sysroot.
    ///
    /// `Ok(None)` when Rust is unavailable or no such library exists.
    pub fn rust_library(&self, name: &str) -> Result<Option<PathBuf>> {
        let Some(sysroot) = self.rust_sysroot()? else {
            tracing::debug!("rust is not available");
            return Ok(None);
        };

        let pattern = sysroot.join("lib").join(format!(
            "lib{}-*.{}",
            name,
            self.platform.shared_lib_ext()
        ));
        let pattern = pattern.to_string_lossy();
        let mut matches: Vec<PathBuf> = glob::glob(&pattern)
            .with_context(|| format!("invalid library pattern {}", pattern))?
            .filter_map(|entry| entry.ok())
            .collect();
        matches.sort();

        if matches.is_empty() {
            tracing::debug!("could not find Rust library {}", name);
        }
        Ok(matches.into_iter().next())
    }
}
