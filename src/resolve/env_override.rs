//! Explicit executable overrides.
//!
//! An override bypasses version-ordered resolution entirely: if the user
//! names a compiler, that compiler is used. It must still be runnable; an
//! override pointing at nothing executable is a configuration error rather
//! than a silent fallback.

use crate::error::{Result, ToolrigError};
use crate::resolve::path::SearchPath;
use crate::resolve::resolver::{Origin, Resolution};

/// Resolve an override named by `var` with value `value`.
///
/// Returns `Ok(None)` when no override is set.
pub fn resolve_override(
    var: &str,
    value: Option<&str>,
    search_path: &SearchPath,
) -> Result<Option<Resolution>> {
    let Some(value) = value else {
        return Ok(None);
    };

    match search_path.which(value) {
        Some(path) => {
            tracing::debug!("{} overrides to {}", var, path.display());
            Ok(Some(Resolution {
                path,
                origin: Origin::Override(var.to_string()),
            }))
        }
        None => Err(ToolrigError::Configuration {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
