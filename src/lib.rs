//! Toolrig - Locate version-matched toolchain binaries and provision them.
//!
//! Toolrig finds executables such as `clang`, `opt` or `gcc` whose reported
//! version is one the caller accepts, and installs prebuilt tool archives
//! into a local cache with idempotent, newer-wins extraction.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging and environment overrides
//! - [`error`] - Error types and result aliases
//! - [`libs`] - Library alias rules, substitutions and `libs` manifests
//! - [`probe`] - Running `--version` and parsing the output
//! - [`provision`] - Download, extraction, stripping and merging of archives
//! - [`resolve`] - Search paths and ordered candidate resolution
//! - [`toolchain`] - LLVM, GCC, DragonEgg and Rust lookups
//!
//! # Example
//!
//! ```
//! use toolrig::libs::{LibraryAliasResolver, Substitutions};
//!
//! let resolver = LibraryAliasResolver::default();
//! assert_eq!(resolver.resolve("lfoorust"), "<rustlib:foo>");
//! assert_eq!(resolver.resolve("lmath"), "lmath");
//!
//! let mut subst = Substitutions::new();
//! subst.register_with_arg("rustlib", |name| Some(format!("/sysroot/lib/lib{}-0.so", name)));
//! assert_eq!(resolver.resolve_with("lstdrust", &subst), "/sysroot/lib/libstd-0.so");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod libs;
pub mod probe;
pub mod provision;
pub mod resolve;
pub mod toolchain;

pub use error::{Result, ToolrigError};
