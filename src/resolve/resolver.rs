//! Ordered candidate search for version-matched tools.
//!
//! Resolution order, first success wins:
//!
//! 1. The unsuffixed name (`clang`), accepted only if its probed version is
//!    one of the accepted versions. This beats every suffixed alternative.
//! 2. For each accepted version in caller order, `clang-3.8` then `clang38`.
//!    The first one found is returned without re-probing; its version is
//!    claimed by its name and tagged [`Origin::ClaimedByName`].
//! 3. Otherwise [`ToolrigError::ToolNotFound`] listing every attempted name.

use crate::error::{Result, ToolrigError};
use crate::probe::{Probe, ToolVersion};
use crate::resolve::path::SearchPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A logical tool and the versions it may be satisfied by, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: String,
    pub accepted_versions: Vec<String>,
}

impl ToolSpec {
    /// Create a spec from a name and versions in priority order.
    pub fn new<I, S>(name: impl Into<String>, accepted_versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            accepted_versions: accepted_versions.into_iter().map(Into::into).collect(),
        }
    }

    /// Every name tried during resolution, in order.
    pub fn candidate_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        for version in &self.accepted_versions {
            names.extend(suffixed_names(&self.name, version));
        }
        names
    }
}

/// The two suffix conventions for `version`: `name-3.8` and `name38`.
pub fn suffixed_names(name: &str, version: &str) -> [String; 2] {
    let digits: String = version.chars().filter(char::is_ascii_digit).collect();
    [format!("{}-{}", name, version), format!("{}{}", name, digits)]
}

/// How a resolved executable's version is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The unsuffixed name was probed and its version accepted.
    Verified(ToolVersion),
    /// The version is taken from the executable's name and was not probed.
    ClaimedByName(String),
    /// Named by an environment override.
    Override(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Verified(v) => write!(f, "verified {}", v),
            Origin::ClaimedByName(v) => write!(f, "unverified {} (by name)", v),
            Origin::Override(var) => write!(f, "override from {}", var),
        }
    }
}

/// A located executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub origin: Origin,
}

impl Resolution {
    /// Whether the version was confirmed by running the executable.
    pub fn is_verified(&self) -> bool {
        matches!(self.origin, Origin::Verified(_))
    }

    /// Re-probe a name-claimed resolution and fail if the versions disagree.
    ///
    /// Verified and override resolutions are returned unchanged.
    pub fn verify(self, probe: &dyn Probe) -> Result<Resolution> {
        let Resolution { path, origin } = self;
        let claimed = match origin {
            Origin::ClaimedByName(claimed) => claimed,
            origin => return Ok(Resolution { path, origin }),
        };
        let actual = probe_version(probe, &path)?;
        if actual.token() != claimed {
            return Err(ToolrigError::VersionMismatch {
                path,
                claimed,
                actual: actual.token(),
            });
        }
        Ok(Resolution {
            path,
            origin: Origin::Verified(actual),
        })
    }
}

/// What to do with a version claimed only by an executable's name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameTrust {
    /// Return it without probing.
    #[default]
    Trust,
    /// Probe it and log a warning on disagreement, but still return it.
    Warn,
    /// Probe it and fail with [`ToolrigError::VersionMismatch`] on disagreement.
    Strict,
}

/// Finds version-matched executables on a search path.
pub struct ToolResolver<'a> {
    search_path: &'a SearchPath,
    probe: &'a dyn Probe,
    name_trust: NameTrust,
}

impl<'a> ToolResolver<'a> {
    /// Create a resolver over `search_path` that validates with `probe`.
    pub fn new(search_path: &'a SearchPath, probe: &'a dyn Probe) -> Self {
        Self {
            search_path,
            probe,
            name_trust: NameTrust::default(),
        }
    }

    /// Set the policy for name-claimed versions.
    pub fn with_name_trust(mut self, name_trust: NameTrust) -> Self {
        self.name_trust = name_trust;
        self
    }

    /// Resolve `spec`, returning `ToolNotFound` if nothing qualifies.
    pub fn resolve(&self, spec: &ToolSpec) -> Result<Resolution> {
        if let Some(path) = self.search_path.which(&spec.name) {
            match self.probe.probe(&path) {
                Ok(version) if version.is_accepted(&spec.accepted_versions) => {
                    tracing::debug!("{} is version {}, accepted", path.display(), version);
                    return Ok(Resolution {
                        path,
                        origin: Origin::Verified(version),
                    });
                }
                Ok(version) => {
                    tracing::debug!("{} is version {}, not accepted", path.display(), version);
                }
                Err(e) => tracing::debug!("{}", e),
            }
        }

        for version in &spec.accepted_versions {
            for candidate in suffixed_names(&spec.name, version) {
                let Some(path) = self.search_path.which(&candidate) else {
                    continue;
                };
                tracing::debug!("found {} at {}", candidate, path.display());
                return self.check_claim(Resolution {
                    path,
                    origin: Origin::ClaimedByName(version.clone()),
                });
            }
        }

        Err(ToolrigError::ToolNotFound {
            tool: spec.name.clone(),
            versions: spec.accepted_versions.clone(),
            attempted: spec.candidate_names(),
        })
    }

    /// Like [`resolve`](Self::resolve), but a missing tool is `Ok(None)`.
    pub fn resolve_optional(&self, spec: &ToolSpec) -> Result<Option<Resolution>> {
        match self.resolve(spec) {
            Ok(resolution) => Ok(Some(resolution)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn check_claim(&self, resolution: Resolution) -> Result<Resolution> {
        match self.name_trust {
            NameTrust::Trust => Ok(resolution),
            NameTrust::Strict => resolution.verify(self.probe),
            NameTrust::Warn => {
                let path = resolution.path.clone();
                match resolution.clone().verify(self.probe) {
                    Ok(verified) => Ok(verified),
                    Err(e) => {
                        tracing::warn!("trusting {} by name: {}", path.display(), e);
                        Ok(resolution)
                    }
                }
            }
        }
    }
}

/// Probe `path`, mapping probe failures onto [`ToolrigError`].
pub fn probe_version(probe: &dyn Probe, path: &Path) -> Result<ToolVersion> {
    probe.probe(path).map_err(|e| match e {
        crate::probe::ProbeError::Unparseable { program, output } => {
            ToolrigError::VersionParse { program, output }
        }
        crate::probe::ProbeError::Spawn { source, .. } => ToolrigError::Io(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Probe answering from a file-name table and recording every call.
    struct TableProbe {
        versions: HashMap<String, ToolVersion>,
        calls: RefCell<Vec<String>>,
    }

    impl TableProbe {
        fn new(entries: &[(&str, u32, u32)]) -> Self {
            Self {
                versions: entries
                    .iter()
                    .map(|(n, maj, min)| (n.to_string(), ToolVersion::new(*maj, *min)))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Probe for TableProbe {
        fn probe(&self, program: &Path) -> std::result::Result<ToolVersion, ProbeError> {
            let name = program.file_name().unwrap().to_string_lossy().to_string();
            self.calls.borrow_mut().push(name.clone());
            self.versions
                .get(&name)
                .cloned()
                .ok_or_else(|| ProbeError::Unparseable {
                    program: program.to_path_buf(),
                    output: "unknown tool".into(),
                })
        }
    }

    fn install(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            let path = dir.join(name);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            }
        }
    }

    #[test]
    fn candidate_names_follow_priority_order() {
        let spec = ToolSpec::new("tool", ["3.8", "3.9"]);
        assert_eq!(
            spec.candidate_names(),
            vec!["tool", "tool-3.8", "tool38", "tool-3.9", "tool39"]
        );
    }

    #[test]
    fn suffixed_names_strip_non_digits() {
        assert_eq!(suffixed_names("gcc", "4.6"), ["gcc-4.6", "gcc46"]);
    }

    #[test]
    fn unsuffixed_accepted_version_wins() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["clang", "clang-3.8"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[("clang", 3, 9), ("clang-3.8", 3, 8)]);

        let spec = ToolSpec::new("clang", ["3.8", "3.9"]);
        let found = ToolResolver::new(&path, &probe).resolve(&spec).unwrap();

        assert_eq!(found.path, temp.path().join("clang"));
        assert_eq!(found.origin, Origin::Verified(ToolVersion::new(3, 9)));
        assert!(found.is_verified());
    }

    #[test]
    fn unsuffixed_wrong_version_falls_through() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["clang", "clang-3.8"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[("clang", 6, 0)]);

        let spec = ToolSpec::new("clang", ["3.8"]);
        let found = ToolResolver::new(&path, &probe).resolve(&spec).unwrap();

        assert_eq!(found.path, temp.path().join("clang-3.8"));
        assert_eq!(found.origin, Origin::ClaimedByName("3.8".into()));
    }

    #[test]
    fn unparseable_unsuffixed_falls_through() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["clang", "clang38"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[]);

        let spec = ToolSpec::new("clang", ["3.8"]);
        let found = ToolResolver::new(&path, &probe).resolve(&spec).unwrap();
        assert_eq!(found.path, temp.path().join("clang38"));
    }

    #[test]
    fn suffixed_versions_tried_in_caller_order() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["tool-3.9", "tool39"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[]);

        let spec = ToolSpec::new("tool", ["3.8", "3.9"]);
        let found = ToolResolver::new(&path, &probe).resolve(&spec).unwrap();

        assert_eq!(found.path, temp.path().join("tool-3.9"));
        assert_eq!(found.origin, Origin::ClaimedByName("3.9".into()));
    }

    #[test]
    fn digits_suffix_used_when_hyphen_missing() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["tool39", "tool-4.0"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[]);

        let spec = ToolSpec::new("tool", ["3.9", "4.0"]);
        let found = ToolResolver::new(&path, &probe).resolve(&spec).unwrap();
        assert_eq!(found.path, temp.path().join("tool39"));
    }

    #[test]
    fn suffixed_match_is_not_probed_by_default() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["llc-3.8"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[("llc-3.8", 6, 0)]);

        let spec = ToolSpec::new("llc", ["3.8"]);
        let found = ToolResolver::new(&path, &probe).resolve(&spec).unwrap();

        assert!(!found.is_verified());
        assert!(probe.calls.borrow().is_empty());
    }

    #[test]
    fn strict_trust_rejects_misnamed_binary() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["llc-3.8"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[("llc-3.8", 6, 0)]);

        let spec = ToolSpec::new("llc", ["3.8"]);
        let err = ToolResolver::new(&path, &probe)
            .with_name_trust(NameTrust::Strict)
            .resolve(&spec)
            .unwrap_err();

        assert!(matches!(err, ToolrigError::VersionMismatch { .. }));
    }

    #[test]
    fn strict_trust_upgrades_matching_claim() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["llc-3.8"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[("llc-3.8", 3, 8)]);

        let spec = ToolSpec::new("llc", ["3.8"]);
        let found = ToolResolver::new(&path, &probe)
            .with_name_trust(NameTrust::Strict)
            .resolve(&spec)
            .unwrap();
        assert!(found.is_verified());
    }

    #[test]
    fn warn_trust_keeps_misnamed_binary() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), &["llc-3.8"]);
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[("llc-3.8", 6, 0)]);

        let spec = ToolSpec::new("llc", ["3.8"]);
        let found = ToolResolver::new(&path, &probe)
            .with_name_trust(NameTrust::Warn)
            .resolve(&spec)
            .unwrap();

        assert_eq!(found.origin, Origin::ClaimedByName("3.8".into()));
        assert_eq!(probe.calls.borrow().as_slice(), ["llc-3.8"]);
    }

    #[test]
    fn not_found_lists_every_attempt() {
        let temp = TempDir::new().unwrap();
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[]);

        let spec = ToolSpec::new("gcc", ["4.6", "4.5"]);
        let err = ToolResolver::new(&path, &probe).resolve(&spec).unwrap_err();

        match err {
            ToolrigError::ToolNotFound {
                tool,
                versions,
                attempted,
            } => {
                assert_eq!(tool, "gcc");
                assert_eq!(versions, vec!["4.6", "4.5"]);
                assert_eq!(attempted, vec!["gcc", "gcc-4.6", "gcc46", "gcc-4.5", "gcc45"]);
            }
            other => panic!("expected ToolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn resolve_optional_maps_not_found_to_none() {
        let temp = TempDir::new().unwrap();
        let path = SearchPath::new([temp.path()]);
        let probe = TableProbe::new(&[]);

        let spec = ToolSpec::new("gfortran", ["4.6"]);
        let found = ToolResolver::new(&path, &probe)
            .resolve_optional(&spec)
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn verify_leaves_verified_resolution_alone() {
        let probe = TableProbe::new(&[]);
        let resolution = Resolution {
            path: PathBuf::from("/usr/bin/clang"),
            origin: Origin::Verified(ToolVersion::new(3, 8)),
        };
        let verified = resolution.clone().verify(&probe).unwrap();
        assert_eq!(verified, resolution);
        assert!(probe.calls.borrow().is_empty());
    }
}
