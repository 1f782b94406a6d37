//! Library alias rules.
//!
//! A rule rewrites a library token such as `lfoorust` into a substitution
//! template such as `<rustlib:foo>`. Patterns are anchored at the end of the
//! token only.

use crate::libs::subst::Substitutions;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Alias rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    pub pattern: String,
    pub replacement: String,
}

/// Rules applied when none are configured.
pub fn default_aliases() -> Vec<AliasConfig> {
    vec![AliasConfig {
        pattern: "l(.*)rust".to_string(),
        replacement: "<rustlib:*>".to_string(),
    }]
}

/// A compiled alias rule.
#[derive(Debug, Clone)]
pub struct AliasRule {
    regex: Regex,
    replacement: String,
}

impl AliasRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let regex = Regex::new(&format!("(?:{})$", pattern))
            .with_context(|| format!("invalid alias pattern '{}'", pattern))?;
        Ok(Self {
            regex,
            replacement: replacement.to_string(),
        })
    }

    /// Rewrite `token` if the rule matches it.
    ///
    /// Every `*` in the replacement becomes the first capture group when
    /// the pattern has one that participated in the match.
    pub fn apply(&self, token: &str) -> Option<String> {
        let caps = self.regex.captures(token)?;
        Some(match caps.get(1) {
            Some(group) => self.replacement.replace('*', group.as_str()),
            None => self.replacement.clone(),
        })
    }
}

/// Ordered list of alias rules. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct LibraryAliasResolver {
    rules: Vec<AliasRule>,
}

impl Default for LibraryAliasResolver {
    fn default() -> Self {
        // default_aliases() holds only valid patterns
        Self::from_config(&default_aliases()).unwrap_or(Self { rules: Vec::new() })
    }
}

impl LibraryAliasResolver {
    pub fn new(rules: Vec<AliasRule>) -> Self {
        Self { rules }
    }

    /// Compile configured rules in order.
    pub fn from_config(aliases: &[AliasConfig]) -> Result<Self> {
        let rules = aliases
            .iter()
            .map(|a| AliasRule::new(&a.pattern, &a.replacement))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Apply the first matching rule, or return `token` unchanged.
    pub fn resolve(&self, token: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(token))
            .unwrap_or_else(|| token.to_string())
    }

    /// Apply the first matching rule, then expand substitution tokens in the
    /// result. Tokens no rule matches are returned as-is.
    pub fn resolve_with(&self, token: &str, subst: &Substitutions<'_>) -> String {
        match self.rules.iter().find_map(|rule| rule.apply(token)) {
            Some(rewritten) => {
                let expanded = subst.substitute(&rewritten);
                tracing::debug!("library alias {} -> {}", token, expanded);
                expanded
            }
            None => token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_alias_captures_name() {
        let resolver = LibraryAliasResolver::default();
        assert_eq!(resolver.resolve("lfoorust"), "<rustlib:foo>");
        assert_eq!(resolver.resolve("lstdrust"), "<rustlib:std>");
    }

    #[test]
    fn unmatched_token_is_unchanged() {
        let resolver = LibraryAliasResolver::default();
        assert_eq!(resolver.resolve("lmath"), "lmath");
        assert_eq!(resolver.resolve("lfoorust.so"), "lfoorust.so");
    }

    #[test]
    fn pattern_is_end_anchored() {
        let rule = AliasRule::new("rust", "<rustlib:std>").unwrap();
        assert_eq!(rule.apply("libfoorust").as_deref(), Some("<rustlib:std>"));
        assert!(rule.apply("rustfoo").is_none());
    }

    #[test]
    fn rule_without_group_keeps_star() {
        let rule = AliasRule::new("libc", "<lib:*>").unwrap();
        assert_eq!(rule.apply("libc").as_deref(), Some("<lib:*>"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let resolver = LibraryAliasResolver::new(vec![
            AliasRule::new("l(.*)rust", "first:*").unwrap(),
            AliasRule::new("l(.*)", "second:*").unwrap(),
        ]);
        assert_eq!(resolver.resolve("lxrust"), "first:x");
        assert_eq!(resolver.resolve("lm"), "second:m");
    }

    #[test]
    fn invalid_pattern_is_error() {
        let err = LibraryAliasResolver::from_config(&[AliasConfig {
            pattern: "l(".into(),
            replacement: "x".into(),
        }])
        .unwrap_err();
        assert!(err.to_string().contains("invalid alias pattern"));
    }

    #[test]
    fn resolve_with_expands_rewritten_tokens() {
        let mut subst = Substitutions::new();
        subst.register_with_arg("rustlib", |name| {
            Some(format!("/sysroot/lib/lib{}-abc123.so", name))
        });

        let resolver = LibraryAliasResolver::default();
        assert_eq!(
            resolver.resolve_with("lstdrust", &subst),
            "/sysroot/lib/libstd-abc123.so"
        );
        assert_eq!(resolver.resolve_with("lmath", &subst), "lmath");
    }
}
