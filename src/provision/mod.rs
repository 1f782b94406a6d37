//! Archive provisioning into a local cache.
//!
//! An [`ArchiveDescriptor`] names candidate URLs and a destination. The
//! [`Provisioner`] downloads the first reachable URL into the cache, extracts
//! it into a staging directory beside the destination, strips leading path
//! components, and merges the result with newer-wins semantics.
//!
//! # Modules
//!
//! - [`cache`] - Cache directory management
//! - [`descriptor`] - Archive descriptors
//! - [`download`] - Multi-URL download
//! - [`extract`] - Tar extraction with compression detection
//! - [`strip`] - Leading-component removal
//! - [`merge`] - Newer-wins tree merge
//! - [`llvm`] - Prebuilt LLVM binaries per platform

pub mod cache;
pub mod descriptor;
pub mod download;
pub mod extract;
pub mod llvm;
pub mod merge;
pub mod provisioner;
pub mod strip;

pub use cache::{default_cache_dir, CacheDirectory, CacheEntry};
pub use descriptor::ArchiveDescriptor;
pub use download::{download, Fetch, HttpFetcher};
pub use llvm::{llvm_binaries, Platform};
pub use merge::MergeStats;
pub use provisioner::{ProvisionReport, Provisioner};
