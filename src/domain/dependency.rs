//! Dependency declarations between skills

use crate::domain::VersionRange;
use crate::error::ManifestError;
use serde::Serialize;
use std::fmt;

/// A declared dependency: one skill requiring another under a range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillDependency {
    /// Name of the skill declaring the dependency
    pub depender: String,
    /// Name of the required skill
    pub name: String,
    /// Version range the required skill must satisfy
    pub range: VersionRange,
    /// Whether resolution may continue without this dependency
    pub optional: bool,
}

impl SkillDependency {
    /// Creates a new dependency; a skill depending on itself is rejected
    pub fn new(
        depender: impl Into<String>,
        name: impl Into<String>,
        range: VersionRange,
        optional: bool,
    ) -> Result<Self, ManifestError> {
        let depender = depender.into();
        let name = name.into();
        if depender == name {
            return Err(ManifestError::SelfDependency { name });
        }
        Ok(Self {
            depender,
            name,
            range,
            optional,
        })
    }

    /// Creates a required dependency
    pub fn required(
        depender: impl Into<String>,
        name: impl Into<String>,
        range: VersionRange,
    ) -> Result<Self, ManifestError> {
        Self::new(depender, name, range, false)
    }

    /// Creates an optional dependency
    pub fn optional(
        depender: impl Into<String>,
        name: impl Into<String>,
        range: VersionRange,
    ) -> Result<Self, ManifestError> {
        Self::new(depender, name, range, true)
    }
}

impl fmt::Display for SkillDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional_marker = if self.optional { " (optional)" } else { "" };
        write!(
            f,
            "{} -> {} {}{}",
            self.depender, self.name, self.range, optional_marker
        )
    }
}
