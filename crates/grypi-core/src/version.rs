//! # Semantic Versions
//!
//! `MAJOR.MINOR.PATCH`, optionally followed by a `-` pre-release label
//! and/or a `+` build label, following the semver.org grammar. Numeric
//! identifiers carry no leading zeros.
//!
//! Two spellings are in use:
//!
//! - [`VersionStyle::Plain`] (`1.2.3`) is what release tags and build
//!   descriptors must agree on.
//! - [`VersionStyle::Prefixed`] (`v1.2.3`) is what the ledger accepts as a
//!   real release tag; anything else is a dry run.
//!
//! Versions are compared by exact string equality, never by precedence.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{GrypiError, GrypiResult};

const SEMVER_BODY: &str = r"(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?";

fn plain_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{SEMVER_BODY}$")).expect("semver pattern compiles"))
}

fn prefixed_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^v{SEMVER_BODY}$")).expect("semver pattern compiles"))
}

/// Which spelling of the semantic-version grammar to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionStyle {
    /// `1.2.3`
    #[default]
    Plain,
    /// `v1.2.3`
    Prefixed,
}

impl VersionStyle {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Plain => plain_pattern(),
            Self::Prefixed => prefixed_pattern(),
        }
    }

    /// Whether `value` satisfies this spelling of the grammar.
    pub fn matches(self, value: &str) -> bool {
        self.pattern().is_match(value)
    }
}

/// Whether `value` is a plain semantic version.
pub fn is_semver(value: &str) -> bool {
    VersionStyle::Plain.matches(value)
}

/// A validated semantic version, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    major: String,
    minor: String,
    patch: String,
    pre_release: Option<String>,
    build: Option<String>,
}

impl Version {
    /// Parse a version in the given style.
    pub fn parse_with(value: &str, style: VersionStyle) -> GrypiResult<Self> {
        let caps = style
            .pattern()
            .captures(value)
            .ok_or_else(|| GrypiError::InvalidVersion {
                value: value.to_string(),
                prefixed: style == VersionStyle::Prefixed,
            })?;
        let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        Ok(Self {
            raw: value.to_string(),
            major: group(1).unwrap_or_default(),
            minor: group(2).unwrap_or_default(),
            patch: group(3).unwrap_or_default(),
            pre_release: group(4),
            build: group(5),
        })
    }

    /// Parse a plain `MAJOR.MINOR.PATCH[-pre][+build]` version.
    pub fn parse(value: &str) -> GrypiResult<Self> {
        Self::parse_with(value, VersionStyle::Plain)
    }

    /// The version exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The `MAJOR`, `MINOR` and `PATCH` components.
    pub fn core(&self) -> (&str, &str, &str) {
        (&self.major, &self.minor, &self.patch)
    }

    /// The pre-release label, without the leading `-`.
    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    /// The build label, without the leading `+`.
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_accepts_release_prerelease_and_build() {
        for v in ["1.0.0", "1.0.0-alpha.1", "1.0.0+build.5", "0.0.0", "10.20.30-rc.1+sha.5114f85"] {
            assert!(is_semver(v), "{v} should match");
        }
    }

    #[test]
    fn plain_rejects_short_long_and_prefixed() {
        for v in ["v1.0", "1.0.0.0", "1.0", "v1.0.0", "01.0.0", "1.0.0-", "1.0.0+", ""] {
            assert!(!is_semver(v), "{v} should not match");
        }
    }

    #[test]
    fn prefixed_requires_leading_v() {
        assert!(VersionStyle::Prefixed.matches("v1.2.3"));
        assert!(VersionStyle::Prefixed.matches("v1.2.3-beta+exp.sha.5114f85"));
        assert!(!VersionStyle::Prefixed.matches("1.2.3"));
        assert!(!VersionStyle::Prefixed.matches("v1.2"));
    }

    #[test]
    fn parse_exposes_components() {
        let v = Version::parse("1.2.3-alpha.1+build.5").unwrap();
        assert_eq!(v.core(), ("1", "2", "3"));
        assert_eq!(v.pre_release(), Some("alpha.1"));
        assert_eq!(v.build(), Some("build.5"));
        assert_eq!(v.to_string(), "1.2.3-alpha.1+build.5");
    }

    #[test]
    fn parse_prefixed_keeps_raw_text() {
        let v = Version::parse_with("v0.4.0", VersionStyle::Prefixed).unwrap();
        assert_eq!(v.as_str(), "v0.4.0");
        assert_eq!(v.core(), ("0", "4", "0"));
        assert_eq!(v.pre_release(), None);
    }

    #[test]
    fn parse_rejects_with_structured_error() {
        match Version::parse("1.0") {
            Err(GrypiError::InvalidVersion { value, prefixed }) => {
                assert_eq!(value, "1.0");
                assert!(!prefixed);
            }
            other => panic!("expected InvalidVersion, got {other:?}"),
        }
    }
}
