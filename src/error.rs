//! Error types for toolrig operations.
//!
//! This module defines [`ToolrigError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `ToolNotFound` is recoverable: callers decide whether it aborts or
//!   silently disables a feature
//! - `VersionParse` means "version unknown" and never aborts on its own
//! - Download, extraction and configuration errors are fatal for the call
//! - Use `anyhow::Error` (via `ToolrigError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for toolrig operations.
#[derive(Debug, Error)]
pub enum ToolrigError {
    /// No executable satisfied the requested tool and versions.
    #[error("Found no supported version {versions:?} of '{tool}' (tried: {})", attempted.join(", "))]
    ToolNotFound {
        tool: String,
        versions: Vec<String>,
        attempted: Vec<String>,
    },

    /// Version output did not match any known grammar.
    #[error("Could not find a version string for {program}: {output}")]
    VersionParse { program: PathBuf, output: String },

    /// A name-claimed version disagreed with the probed one.
    #[error("{path} claims version {claimed} by name but reports {actual}")]
    VersionMismatch {
        path: PathBuf,
        claimed: String,
        actual: String,
    },

    /// Every candidate URL failed to download.
    #[error("Failed to download from any of [{}]: {message}", urls.join(", "))]
    Download { urls: Vec<String>, message: String },

    /// Archive could not be extracted or merged.
    #[error("Failed to extract {archive}: {message}")]
    Extraction { archive: PathBuf, message: String },

    /// An environment override names something that is not an executable.
    #[error("{var}={value} specifies an invalid command")]
    Configuration { var: String, value: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolrigError {
    /// Whether this error only reports a missing tool.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ToolrigError::ToolNotFound { .. })
    }
}

/// Result type alias for toolrig operations.
pub type Result<T> = std::result::Result<T, ToolrigError>;
