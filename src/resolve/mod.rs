//! Locating version-matched executables.
//!
//! # Modules
//!
//! - [`path`] - Search path parsing and `which`-style lookup
//! - [`resolver`] - Ordered candidate search against accepted versions
//! - [`env_override`] - Explicit executable overrides

pub mod env_override;
pub mod path;
pub mod resolver;

pub use env_override::resolve_override;
pub use path::{is_executable, SearchPath};
pub use resolver::{
    probe_version, suffixed_names, NameTrust, Origin, Resolution, ToolResolver, ToolSpec,
};
