//! A single published release of a skill

use crate::domain::{SkillDependency, Version};
use serde::Serialize;
use std::fmt;

/// One available version of a skill and its declared dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillRelease {
    /// Skill name
    pub name: String,
    /// Release version
    pub version: Version,
    /// Dependencies declared by this release
    pub dependencies: Vec<SkillDependency>,
    /// Free-form description from the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SkillRelease {
    /// Creates a release with no dependencies
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            dependencies: Vec::new(),
            description: None,
        }
    }

    /// Sets the dependency list (builder pattern)
    pub fn with_dependencies(mut self, dependencies: Vec<SkillDependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Sets the description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Required dependencies only
    pub fn required_dependencies(&self) -> impl Iterator<Item = &SkillDependency> {
        self.dependencies.iter().filter(|d| !d.optional)
    }
}

impl fmt::Display for SkillRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
