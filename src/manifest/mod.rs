//! Skill manifest records and parsing
//!
//! This module provides:
//! - Serde record types matching the manifest file shape
//! - Per-format parsing (YAML, TOML, JSON) into domain values
//! - Skill name validation
//!
//! The resolver consumes the parsed records and does not care how they
//! were produced; an in-memory catalog built in tests is as good as one
//! loaded from disk.

mod detector;

pub use detector::{detect_manifests, ManifestFormat, ManifestInfo, ManifestKind};

use crate::domain::{SkillDependency, SkillRelease, Version, VersionRange};
use crate::error::ManifestError;
use crate::migration::MigrationStep;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

static SKILL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid skill name pattern"));

/// Raw skill manifest record, as deserialized from a manifest file
#[derive(Debug, Clone, Deserialize)]
pub struct SkillManifest {
    /// Skill name
    pub name: String,
    /// Release version text
    pub version: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Declared dependencies
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
}

/// One dependency declaration inside a skill manifest
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyDecl {
    /// Name of the required skill
    pub name: String,
    /// Constraint text (`>=1.0.0,<2.0.0`, `^1.2.3`, ...)
    pub version: String,
    /// Whether resolution may continue without it
    #[serde(default)]
    pub optional: bool,
}

/// Raw migration step file record
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationManifest {
    /// The skill these steps belong to
    pub skill: String,
    /// Authored steps
    #[serde(default)]
    pub steps: Vec<MigrationStepDecl>,
}

/// One step declaration inside a migration step file
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationStepDecl {
    /// Version text the step starts from
    pub from: String,
    /// Version text the step ends at
    pub to: String,
    /// What the step does
    #[serde(default)]
    pub description: String,
}

/// True if the name matches the allowed skill name pattern
pub fn is_valid_skill_name(name: &str) -> bool {
    SKILL_NAME.is_match(name)
}

fn deserialize<T: for<'de> Deserialize<'de>>(
    path: &Path,
    format: ManifestFormat,
    content: &str,
) -> Result<T, ManifestError> {
    match format {
        ManifestFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error(path, e.to_string())),
        ManifestFormat::Toml => {
            toml::from_str(content).map_err(|e| ManifestError::toml_parse_error(path, e.to_string()))
        }
        ManifestFormat::Json => serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string())),
    }
}

/// Parses skill manifest content into a release.
///
/// Version and constraint parse failures are surfaced verbatim with the
/// file they came from; nothing is defaulted.
pub fn parse_skill_manifest(
    path: &Path,
    format: ManifestFormat,
    content: &str,
) -> Result<SkillRelease, ManifestError> {
    let record: SkillManifest = deserialize(path, format, content)?;

    if !is_valid_skill_name(&record.name) {
        return Err(ManifestError::InvalidSkillName {
            path: path.to_path_buf(),
            name: record.name,
        });
    }
    let version = Version::parse(&record.version)
        .map_err(|e| ManifestError::invalid_version(path, e))?;

    let mut dependencies = Vec::with_capacity(record.dependencies.len());
    for decl in &record.dependencies {
        if !is_valid_skill_name(&decl.name) {
            return Err(ManifestError::InvalidSkillName {
                path: path.to_path_buf(),
                name: decl.name.clone(),
            });
        }
        let range = VersionRange::parse(&decl.version)
            .map_err(|e| ManifestError::invalid_version(path, e))?;
        dependencies.push(SkillDependency::new(
            record.name.clone(),
            decl.name.clone(),
            range,
            decl.optional,
        )?);
    }

    let mut release = SkillRelease::new(record.name, version).with_dependencies(dependencies);
    if let Some(description) = record.description {
        release = release.with_description(description);
    }
    Ok(release)
}

/// Parses migration step file content into (skill name, steps)
pub fn parse_migration_manifest(
    path: &Path,
    format: ManifestFormat,
    content: &str,
) -> Result<(String, Vec<MigrationStep>), ManifestError> {
    let record: MigrationManifest = deserialize(path, format, content)?;

    if !is_valid_skill_name(&record.skill) {
        return Err(ManifestError::InvalidSkillName {
            path: path.to_path_buf(),
            name: record.skill,
        });
    }

    let mut steps = Vec::with_capacity(record.steps.len());
    for decl in &record.steps {
        let from = Version::parse(&decl.from)
            .map_err(|e| ManifestError::invalid_version(path, e))?;
        let to = Version::parse(&decl.to).map_err(|e| ManifestError::invalid_version(path, e))?;
        steps.push(MigrationStep::new(from, to, decl.description.clone()));
    }
    Ok((record.skill, steps))
}
