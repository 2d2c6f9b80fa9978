//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionParseError: malformed version or constraint text
//! - ManifestError: issues with skill manifest files
//! - ResolveError: dependency resolution failures
//! - MigrationError: migration path planning failures

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum SkillDepError {
    /// Version or constraint parsing errors
    #[error(transparent)]
    Parse(#[from] VersionParseError),

    /// Skill manifest related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Dependency resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Migration planning errors
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Errors from parsing version or constraint text
///
/// Malformed input is always surfaced verbatim to the caller, never
/// silently defaulted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    /// Empty version string
    #[error("empty version string")]
    Empty,

    /// Version text does not match major.minor.patch[-prerelease][+build]
    #[error("invalid version '{text}': {message}")]
    InvalidVersion { text: String, message: String },

    /// A numeric component does not fit in 64 bits
    #[error("invalid version '{text}': {component} component overflows 64 bits")]
    Overflow {
        text: String,
        component: &'static str,
    },

    /// Prerelease identifier is not a recognized kind
    #[error("invalid version '{text}': unknown prerelease identifier '{ident}'")]
    UnknownPrerelease { text: String, ident: String },

    /// Constraint text has an invalid operator or version part
    #[error("invalid constraint '{text}': {message}")]
    InvalidConstraint { text: String, message: String },
}

impl VersionParseError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(text: impl Into<String>, message: impl Into<String>) -> Self {
        VersionParseError::InvalidVersion {
            text: text.into(),
            message: message.into(),
        }
    }

    /// Creates a new Overflow error
    pub fn overflow(text: impl Into<String>, component: &'static str) -> Self {
        VersionParseError::Overflow {
            text: text.into(),
            component,
        }
    }

    /// Creates a new UnknownPrerelease error
    pub fn unknown_prerelease(text: impl Into<String>, ident: impl Into<String>) -> Self {
        VersionParseError::UnknownPrerelease {
            text: text.into(),
            ident: ident.into(),
        }
    }

    /// Creates a new InvalidConstraint error
    pub fn invalid_constraint(text: impl Into<String>, message: impl Into<String>) -> Self {
        VersionParseError::InvalidConstraint {
            text: text.into(),
            message: message.into(),
        }
    }
}

/// Errors related to skill manifest files
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("failed to parse YAML in {path}: {message}")]
    YamlParseError { path: PathBuf, message: String },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// Unsupported manifest format
    #[error("unsupported manifest format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Skill name does not match the allowed pattern
    #[error("invalid skill name '{name}' in {path}")]
    InvalidSkillName { path: PathBuf, name: String },

    /// A skill declared a dependency on itself
    #[error("skill '{name}' cannot depend on itself")]
    SelfDependency { name: String },

    /// The same (name, version) pair was declared twice
    #[error("duplicate release {name} {version} (already declared in {first})")]
    DuplicateRelease {
        name: String,
        version: String,
        first: PathBuf,
    },

    /// Version or constraint text inside a manifest failed to parse
    #[error("in {path}: {source}")]
    InvalidVersion {
        path: PathBuf,
        #[source]
        source: VersionParseError,
    },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new YamlParseError
    pub fn yaml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::YamlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidVersion error
    pub fn invalid_version(path: impl Into<PathBuf>, source: VersionParseError) -> Self {
        ManifestError::InvalidVersion {
            path: path.into(),
            source,
        }
    }
}

/// A single requester of a dependency: who wants it and under what range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requester {
    /// Name of the skill declaring the dependency
    pub depender: String,
    /// Constraint range text as declared
    pub range: String,
}

/// A required dependency name is absent from the catalog entirely
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependency {
    /// The dependency that could not be found
    pub name: String,
    /// Skills that require it; empty when requested as a resolution root
    pub requesters: Vec<Requester>,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.requesters.is_empty() {
            write!(
                f,
                "skill '{}' is not present in the catalog (requested as a resolution root)",
                self.name
            )
        } else {
            let requesters: Vec<String> = self
                .requesters
                .iter()
                .map(|r| format!("{} ({})", r.depender, r.range))
                .collect();
            write!(
                f,
                "required dependency '{}' is not present in the catalog (required by: {})",
                self.name,
                requesters.join(", ")
            )
        }
    }
}

/// No single version of a dependency satisfies every inbound range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConflict {
    /// The dependency that could not be satisfied
    pub name: String,
    /// Every requester and its declared range
    pub requesters: Vec<Requester>,
    /// Human-readable explanation of the failure
    pub reason: String,
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requesters: Vec<String> = self
            .requesters
            .iter()
            .map(|r| format!("{} requires {}", r.depender, r.range))
            .collect();
        write!(
            f,
            "no version of '{}' satisfies all constraints: {} ({})",
            self.name,
            requesters.join("; "),
            self.reason
        )
    }
}

/// A cycle among required dependency edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircularDependency {
    /// The cycle as an ordered path; the first node is repeated implicitly
    pub cycle: Vec<String>,
}

impl fmt::Display for CircularDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path = self.cycle.join(" -> ");
        if let Some(first) = self.cycle.first() {
            path.push_str(" -> ");
            path.push_str(first);
        }
        write!(f, "circular dependency detected: {}", path)
    }
}

/// Errors produced by dependency resolution
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveError {
    /// A required dependency name is absent from the catalog
    #[error("{0}")]
    Missing(MissingDependency),

    /// A dependency is present but unsatisfiable across accumulated ranges
    #[error("{0}")]
    Conflict(VersionConflict),

    /// A cycle among required edges
    #[error("{0}")]
    Cycle(CircularDependency),
}

/// Errors produced by migration planning
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationError {
    /// The target version is unreachable from the current version
    #[error("no migration path for skill '{skill}' from {from} to {to}")]
    NoPath {
        skill: String,
        from: String,
        to: String,
    },
}
