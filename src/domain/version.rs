//! Semantic version parsing and comparison for skill releases
//!
//! Handles version identifiers of the form:
//! - `1.2.3`
//! - `1.2.3-alpha`, `1.2.3-beta.2`, `1.2.3-rc1`
//! - `1.2.3+build.17` (build metadata is informational only)

use crate::error::VersionParseError;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Recognized prerelease kinds, in ascending precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrereleaseKind {
    /// Alpha prerelease (`-alpha`)
    Alpha,
    /// Beta prerelease (`-beta`)
    Beta,
    /// Release candidate (`-rc`)
    Rc,
}

impl PrereleaseKind {
    /// The identifier token for this kind
    pub fn token(&self) -> &'static str {
        match self {
            PrereleaseKind::Alpha => "alpha",
            PrereleaseKind::Beta => "beta",
            PrereleaseKind::Rc => "rc",
        }
    }
}

impl fmt::Display for PrereleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A prerelease component: kind plus numeric suffix
///
/// A bare kind (`-alpha`) is number 0, so `1.0.0-alpha` and
/// `1.0.0-alpha.0` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prerelease {
    /// The prerelease kind
    pub kind: PrereleaseKind,
    /// Numeric suffix (`alpha.1`, `rc2`)
    pub number: u64,
}

impl Prerelease {
    /// Creates a new prerelease component
    pub fn new(kind: PrereleaseKind, number: u64) -> Self {
        Self { kind, number }
    }

    fn parse(text: &str, full: &str) -> Result<Self, VersionParseError> {
        let (kind, rest) = if let Some(rest) = text.strip_prefix("alpha") {
            (PrereleaseKind::Alpha, rest)
        } else if let Some(rest) = text.strip_prefix("beta") {
            (PrereleaseKind::Beta, rest)
        } else if let Some(rest) = text.strip_prefix("rc") {
            (PrereleaseKind::Rc, rest)
        } else {
            return Err(VersionParseError::unknown_prerelease(full, text));
        };

        // Accepted suffix spellings: "", ".N", "N"
        if rest.is_empty() {
            return Ok(Self::new(kind, 0));
        }
        let (number_str, dotted) = match rest.strip_prefix('.') {
            Some(number_str) => (number_str, true),
            None => (rest, false),
        };
        if number_str.is_empty() || !number_str.chars().all(|c| c.is_ascii_digit()) {
            // "alpha.x" is a recognized kind with a bad number; "alphax"
            // is not a recognized kind at all.
            if dotted {
                return Err(VersionParseError::invalid_version(
                    full,
                    "prerelease number is not a non-negative integer",
                ));
            }
            return Err(VersionParseError::unknown_prerelease(full, text));
        }
        let number = number_str
            .parse::<u64>()
            .map_err(|_| VersionParseError::overflow(full, "prerelease"))?;
        Ok(Self::new(kind, number))
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.number == 0 {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}.{}", self.kind, self.number)
        }
    }
}

/// An immutable semantic version
///
/// Ordering compares major, minor, patch numerically; a prerelease orders
/// before the same release triple; among prereleases, kind then number.
/// Build metadata never affects ordering or equality.
#[derive(Debug, Clone)]
pub struct Version {
    /// Major version number
    pub major: u64,
    /// Minor version number
    pub minor: u64,
    /// Patch version number
    pub patch: u64,
    /// Optional prerelease component
    pub prerelease: Option<Prerelease>,
    /// Optional build metadata (informational only)
    pub build: Option<String>,
}

impl Version {
    /// Creates a release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Sets the prerelease component (builder pattern)
    pub fn with_prerelease(mut self, kind: PrereleaseKind, number: u64) -> Self {
        self.prerelease = Some(Prerelease::new(kind, number));
        self
    }

    /// Sets build metadata (builder pattern)
    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// Parses version text, surfacing the exact failure
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        text.parse()
    }

    /// Returns true if this version has a prerelease component
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The version without prerelease or build metadata
    pub fn base(&self) -> Self {
        Self::new(self.major, self.minor, self.patch)
    }
}

fn parse_component(part: &str, component: &'static str, full: &str) -> Result<u64, VersionParseError> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(VersionParseError::invalid_version(
            full,
            format!("{} component is not a non-negative integer", component),
        ));
    }
    part.parse::<u64>()
        .map_err(|_| VersionParseError::overflow(full, component))
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let full = s.trim();
        if full.is_empty() {
            return Err(VersionParseError::Empty);
        }

        // Split off build metadata first; it may itself contain '-'
        let (rest, build) = match full.split_once('+') {
            Some((rest, build)) => {
                if build.is_empty()
                    || !build
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
                {
                    return Err(VersionParseError::invalid_version(
                        full,
                        "build metadata must be dot-separated alphanumerics",
                    ));
                }
                (rest, Some(build.to_string()))
            }
            None => (full, None),
        };

        let (core, prerelease) = match rest.split_once('-') {
            Some((core, pre)) => {
                if pre.is_empty() {
                    return Err(VersionParseError::invalid_version(
                        full,
                        "empty prerelease identifier",
                    ));
                }
                (core, Some(Prerelease::parse(pre, full)?))
            }
            None => (rest, None),
        };

        let mut parts = core.split('.');
        let (major, minor, patch) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(ma), Some(mi), Some(pa), None) => (
                parse_component(ma, "major", full)?,
                parse_component(mi, "minor", full)?,
                parse_component(pa, "patch", full)?,
            ),
            _ => {
                return Err(VersionParseError::invalid_version(
                    full,
                    "expected major.minor.patch",
                ))
            }
        };

        Ok(Version {
            major,
            minor,
            patch,
            prerelease,
            build,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

// Equality and hashing ignore build metadata; two versions are the same
// release if major/minor/patch/prerelease match.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.prerelease == other.prerelease
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match self.patch.cmp(&other.patch) {
            Ordering::Equal => {}
            ord => return ord,
        }
        // A prerelease orders before the release it precedes
        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
