//! Skill manifest discovery
//!
//! Features:
//! - Detects skill.yaml / skill.yml / skill.toml / skill.json manifests
//! - Detects migrations.* step files alongside them
//! - Scans the catalog root plus two directory levels below it
//!   (`<root>/<skill>/skill.yaml`, `<root>/<skill>/<version>/skill.yaml`)

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk serialization format of a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// skill.yaml / skill.yml
    Yaml,
    /// skill.toml
    Toml,
    /// skill.json
    Json,
}

/// What a manifest file declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// A skill release (name, version, dependencies)
    Skill,
    /// Authored migration steps for a skill
    Migrations,
}

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Serialization format
    pub format: ManifestFormat,
    /// What the file declares
    pub kind: ManifestKind,
}

impl ManifestInfo {
    /// Creates a new ManifestInfo
    pub fn new(path: impl Into<PathBuf>, format: ManifestFormat, kind: ManifestKind) -> Self {
        Self {
            path: path.into(),
            format,
            kind,
        }
    }
}

/// Classifies a file name as a manifest, if it is one
fn classify(path: &Path) -> Option<(ManifestFormat, ManifestKind)> {
    let name = path.file_name()?.to_str()?;
    let (stem, format) = if let Some(stem) = name.strip_suffix(".yaml") {
        (stem, ManifestFormat::Yaml)
    } else if let Some(stem) = name.strip_suffix(".yml") {
        (stem, ManifestFormat::Yaml)
    } else if let Some(stem) = name.strip_suffix(".toml") {
        (stem, ManifestFormat::Toml)
    } else if let Some(stem) = name.strip_suffix(".json") {
        (stem, ManifestFormat::Json)
    } else {
        return None;
    };
    match stem {
        "skill" => Some((format, ManifestKind::Skill)),
        "migrations" => Some((format, ManifestKind::Migrations)),
        _ => None,
    }
}

/// Child directories of `dir` in ascending name order
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        debug!(path = %dir.display(), "directory not readable, skipping");
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Manifest files directly inside `dir`, in ascending name order
fn manifests_in(dir: &Path) -> Vec<ManifestInfo> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
        .into_iter()
        .filter_map(|path| {
            classify(&path).map(|(format, kind)| ManifestInfo::new(path, format, kind))
        })
        .collect()
}

/// Detects all skill and migration manifests under `dir`.
///
/// The scan order (root, then each skill directory, then each version
/// directory, each in ascending name order) is deterministic so repeated
/// runs see the same manifest list.
pub fn detect_manifests(dir: &Path) -> Vec<ManifestInfo> {
    let mut manifests = manifests_in(dir);
    for skill_dir in subdirectories(dir) {
        manifests.extend(manifests_in(&skill_dir));
        for version_dir in subdirectories(&skill_dir) {
            manifests.extend(manifests_in(&version_dir));
        }
    }
    debug!(count = manifests.len(), path = %dir.display(), "manifest scan complete");
    manifests
}
