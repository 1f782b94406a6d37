//! Version grammars for `--version` output.
//!
//! Tools print their version in wildly different shapes. Two grammars cover
//! the toolchains we care about:
//!
//! - [`VersionGrammar::Llvm`]: an optional `clang`/`LLVM` product prefix, an
//!   optional `version` keyword, then `<major>.<minor>` and an optional
//!   `.<patch>`
//! - [`VersionGrammar::Gcc`]: a bare `<major>.<minor>.<patch>` triplet
//!
//! Both return the first match anywhere in the output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static LLVM_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<product>clang |llvm )?(?:version )?(?P<major>\d+)\.(?P<minor>\d+)(?:\.(?P<patch>\d+))?",
    )
    .unwrap()
});

static GCC_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)").unwrap()
});

/// Which output grammar a tool speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VersionGrammar {
    /// clang, opt, llc, llvm-as and friends.
    #[default]
    Llvm,
    /// gcc, g++, gfortran.
    Gcc,
}

/// Product prefix seen in front of an LLVM-style version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    Clang,
    Llvm,
}

/// A parsed tool version.
///
/// Only `<major>.<minor>` takes part in matching (see [`ToolVersion::token`]);
/// the patch level is kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub product: Option<Product>,
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl ToolVersion {
    /// Create a version without product or patch information.
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            product: None,
            major,
            minor,
            patch: None,
        }
    }

    /// The `<major>.<minor>` token compared against accepted versions.
    pub fn token(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Whether the token is one of `accepted` (exact string comparison).
    pub fn is_accepted<S: AsRef<str>>(&self, accepted: &[S]) -> bool {
        let token = self.token();
        accepted.iter().any(|v| v.as_ref() == token)
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for ToolVersion {
    type Err = String;

    /// Parse a `<major>.<minor>` token such as `"3.8"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| format!("invalid version token: {}", s))?;
        let major = major
            .parse()
            .map_err(|_| format!("invalid version token: {}", s))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid version token: {}", s))?;
        Ok(Self::new(major, minor))
    }
}

impl VersionGrammar {
    /// Extract the first version in `output`, or `None` if nothing matches.
    pub fn parse(self, output: &str) -> Option<ToolVersion> {
        let caps = match self {
            VersionGrammar::Llvm => LLVM_VERSION.captures(output)?,
            VersionGrammar::Gcc => GCC_VERSION.captures(output)?,
        };

        let product = caps.name("product").map(|m| {
            if m.as_str().trim().eq_ignore_ascii_case("clang") {
                Product::Clang
            } else {
                Product::Llvm
            }
        });

        Some(ToolVersion {
            product,
            major: caps["major"].parse().ok()?,
            minor: caps["minor"].parse().ok()?,
            patch: caps.name("patch").and_then(|m| m.as_str().parse().ok()),
        })
    }
}

/// Extra clang arguments a given clang version needs to emit optimizable IR.
///
/// clang 5 and 6 mark every function `optnone` at `-O0`, which defeats
/// downstream optimization passes.
pub fn clang_implicit_args(version: Option<&ToolVersion>) -> Vec<String> {
    match version {
        Some(v) if v.major == 5 || v.major == 6 => {
            vec!["-Xclang".to_string(), "-disable-O0-optnone".to_string()]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llvm_parses_clang_version_line() {
        let v = VersionGrammar::Llvm
            .parse("clang version 3.8.0 (tags/RELEASE_380/final)")
            .unwrap();
        assert_eq!(v.token(), "3.8");
        assert_eq!(v.product, Some(Product::Clang));
        assert_eq!(v.patch, Some(0));
    }

    #[test]
    fn llvm_parses_llvm_prefix() {
        let v = VersionGrammar::Llvm.parse("LLVM 6.0.1").unwrap();
        assert_eq!(v.token(), "6.0");
        assert_eq!(v.product, Some(Product::Llvm));
    }

    #[test]
    fn llvm_parses_opt_output() {
        let output = "LLVM (http://llvm.org/):\n  LLVM version 4.0.1\n  Optimized build.\n";
        let v = VersionGrammar::Llvm.parse(output).unwrap();
        assert_eq!(v.token(), "4.0");
    }

    #[test]
    fn llvm_prefix_is_case_insensitive() {
        let v = VersionGrammar::Llvm.parse("Clang Version 5.0.2").unwrap();
        assert_eq!(v.token(), "5.0");
        assert_eq!(v.product, Some(Product::Clang));
    }

    #[test]
    fn llvm_accepts_missing_patch() {
        let v = VersionGrammar::Llvm.parse("clang version 3.2").unwrap();
        assert_eq!(v.token(), "3.2");
        assert_eq!(v.patch, None);
    }

    #[test]
    fn llvm_handles_vendor_prefix() {
        let v = VersionGrammar::Llvm
            .parse("Ubuntu clang version 14.0.0-1ubuntu1")
            .unwrap();
        assert_eq!(v.token(), "14.0");
    }

    #[test]
    fn gcc_parses_bare_triplet() {
        let v = VersionGrammar::Gcc.parse("4.6.3").unwrap();
        assert_eq!(v.token(), "4.6");
        assert_eq!(v.patch, Some(3));
    }

    #[test]
    fn gcc_parses_first_triplet_in_banner() {
        let output = "gcc (Ubuntu/Linaro 4.6.3-1ubuntu5) 4.6.3\nCopyright (C) 2011";
        let v = VersionGrammar::Gcc.parse(output).unwrap();
        assert_eq!(v.token(), "4.6");
    }

    #[test]
    fn gcc_requires_patch() {
        assert!(VersionGrammar::Gcc.parse("version 4.6").is_none());
    }

    #[test]
    fn malformed_output_fails() {
        assert!(VersionGrammar::Llvm.parse("unknown tool").is_none());
        assert!(VersionGrammar::Gcc.parse("unknown tool").is_none());
    }

    #[test]
    fn is_accepted_uses_exact_tokens() {
        let v = ToolVersion::new(3, 8);
        assert!(v.is_accepted(&["3.9", "3.8"]));
        assert!(!v.is_accepted(&["3.80", "3"]));
    }

    #[test]
    fn token_from_str() {
        let v: ToolVersion = "4.0".parse().unwrap();
        assert_eq!(v, ToolVersion::new(4, 0));
        assert!("four".parse::<ToolVersion>().is_err());
        assert!("4".parse::<ToolVersion>().is_err());
    }

    #[test]
    fn display_includes_patch() {
        let v = VersionGrammar::Llvm.parse("LLVM 6.0.1").unwrap();
        assert_eq!(v.to_string(), "6.0.1");
        assert_eq!(ToolVersion::new(3, 2).to_string(), "3.2");
    }

    #[test]
    fn clang_implicit_args_for_optnone_versions() {
        assert_eq!(
            clang_implicit_args(Some(&ToolVersion::new(5, 0))),
            vec!["-Xclang", "-disable-O0-optnone"]
        );
        assert_eq!(clang_implicit_args(Some(&ToolVersion::new(6, 0))).len(), 2);
        assert!(clang_implicit_args(Some(&ToolVersion::new(3, 8))).is_empty());
        assert!(clang_implicit_args(None).is_empty());
    }
}
