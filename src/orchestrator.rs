//! Orchestrator coordinating the discover -> parse -> resolve -> check
//! workflow
//!
//! This module provides:
//! - Catalog loading from a directory of skill manifests
//! - Error collection with partial continuation (one bad manifest does
//!   not hide the others)
//! - Resolution and health checking wired into a single report
//!
//! The pure engine underneath performs no I/O; every filesystem touch
//! happens here, before resolution starts.

use crate::domain::Version;
use crate::error::{ManifestError, ResolveError, SkillDepError};
use crate::manifest::{
    detect_manifests, parse_migration_manifest, parse_skill_manifest, ManifestKind,
};
use crate::migration::{self, MigrationPath, MigrationStep};
use crate::resolver::health::{self, DependencyHealth};
use crate::resolver::{self, Catalog, ResolutionPlan};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Coordinates catalog loading and resolution for one directory
pub struct Orchestrator {
    /// Catalog root directory
    path: PathBuf,
    /// Resolution roots; empty means every skill in the catalog
    roots: Vec<String>,
}

/// Result of loading a catalog directory
#[derive(Debug, Default)]
pub struct LoadedCatalog {
    /// All successfully parsed releases
    pub catalog: Catalog,
    /// Authored migration steps per skill name
    pub migrations: BTreeMap<String, Vec<MigrationStep>>,
    /// Per-file errors; loading continues past them
    pub errors: Vec<ManifestError>,
}

/// Combined outcome of resolution and health checking
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Number of distinct skills in the catalog
    pub skills: usize,
    /// Manifest files that failed to load, as rendered messages
    pub load_errors: Vec<String>,
    /// The resolved plan, when resolution succeeded
    pub plan: Option<ResolutionPlan>,
    /// The resolution failure, when it did not
    pub error: Option<ResolveError>,
    /// Health report for every plan edge
    pub health: Vec<DependencyHealth>,
}

impl ValidationReport {
    /// True if resolution succeeded and every edge is healthy
    pub fn resolution_ok(&self) -> bool {
        self.error.is_none() && health::is_healthy(&self.health)
    }

    /// True if any manifest failed to load
    pub fn has_load_errors(&self) -> bool {
        !self.load_errors.is_empty()
    }
}

impl Orchestrator {
    /// Creates an orchestrator for a catalog directory
    pub fn new(path: impl Into<PathBuf>, roots: Vec<String>) -> Self {
        Self {
            path: path.into(),
            roots,
        }
    }

    /// The catalog root directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every manifest under the catalog root.
    ///
    /// A manifest that fails to read or parse is recorded and skipped;
    /// the remaining files still load.
    pub fn load(&self) -> LoadedCatalog {
        let mut loaded = LoadedCatalog::default();
        let mut seen: BTreeMap<(String, String), PathBuf> = BTreeMap::new();

        for info in detect_manifests(&self.path) {
            let content = match std::fs::read_to_string(&info.path) {
                Ok(content) => content,
                Err(e) => {
                    loaded.errors.push(ManifestError::read_error(&info.path, e));
                    continue;
                }
            };

            match info.kind {
                ManifestKind::Skill => {
                    match parse_skill_manifest(&info.path, info.format, &content) {
                        Ok(release) => {
                            let key = (release.name.clone(), release.version.to_string());
                            if let Some(first) = seen.get(&key) {
                                loaded.errors.push(ManifestError::DuplicateRelease {
                                    name: key.0,
                                    version: key.1,
                                    first: first.clone(),
                                });
                                continue;
                            }
                            seen.insert(key, info.path.clone());
                            debug!(skill = %release.name, version = %release.version, "loaded release");
                            loaded.catalog.add_release(release);
                        }
                        Err(e) => loaded.errors.push(e),
                    }
                }
                ManifestKind::Migrations => {
                    match parse_migration_manifest(&info.path, info.format, &content) {
                        Ok((skill, steps)) => {
                            debug!(skill = %skill, steps = steps.len(), "loaded migration steps");
                            loaded.migrations.entry(skill).or_default().extend(steps);
                        }
                        Err(e) => loaded.errors.push(e),
                    }
                }
            }
        }

        loaded
    }

    /// The effective resolution roots for a loaded catalog
    fn effective_roots(&self, catalog: &Catalog) -> Vec<String> {
        if self.roots.is_empty() {
            catalog.names().map(String::from).collect()
        } else {
            self.roots.clone()
        }
    }

    /// Loads, resolves, and health-checks the catalog
    pub fn validate(&self) -> ValidationReport {
        let loaded = self.load();
        let roots = self.effective_roots(&loaded.catalog);
        let load_errors: Vec<String> = loaded.errors.iter().map(|e| e.to_string()).collect();

        match resolver::resolve(&loaded.catalog, &roots) {
            Ok(plan) => {
                let health = health::check(&plan);
                ValidationReport {
                    skills: loaded.catalog.len(),
                    load_errors,
                    plan: Some(plan),
                    error: None,
                    health,
                }
            }
            Err(error) => ValidationReport {
                skills: loaded.catalog.len(),
                load_errors,
                plan: None,
                error: Some(error),
                health: Vec::new(),
            },
        }
    }

    /// Plans a migration path for one skill from authored step files
    pub fn plan_migration(
        &self,
        skill: &str,
        from: &str,
        to: &str,
    ) -> Result<MigrationPath, SkillDepError> {
        let from = Version::parse(from)?;
        let to = Version::parse(to)?;
        let loaded = self.load();
        let steps = loaded
            .migrations
            .get(skill)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Ok(migration::plan(skill, steps, &from, &to)?)
    }
}
