//! Catalog of available skill releases
//!
//! A catalog is an explicit value built by the loader and passed into each
//! resolution call; the resolver holds no registry state between calls.

use crate::domain::{SkillRelease, Version, VersionRange};
use std::collections::BTreeMap;

/// All known releases, keyed by skill name
///
/// Releases for a name are kept in ascending version order so that
/// "highest satisfying" scans are a reverse walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    skills: BTreeMap<String, Vec<SkillRelease>>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a release, keeping the version list sorted.
    ///
    /// A release with the same version replaces the earlier one; duplicate
    /// detection with file context happens at manifest load time.
    pub fn add_release(&mut self, release: SkillRelease) {
        let releases = self.skills.entry(release.name.clone()).or_default();
        match releases.binary_search_by(|r| r.version.cmp(&release.version)) {
            Ok(pos) => releases[pos] = release,
            Err(pos) => releases.insert(pos, release),
        }
    }

    /// All releases for a name in ascending version order
    pub fn releases(&self, name: &str) -> &[SkillRelease] {
        self.skills.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A specific release, if present
    pub fn release(&self, name: &str, version: &Version) -> Option<&SkillRelease> {
        self.releases(name).iter().find(|r| &r.version == version)
    }

    /// True if the catalog has at least one release for this name
    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    /// Skill names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(String::as_str)
    }

    /// The highest release of a name satisfying every given range
    pub fn highest_satisfying(
        &self,
        name: &str,
        ranges: &[&VersionRange],
    ) -> Option<&SkillRelease> {
        self.releases(name)
            .iter()
            .rev()
            .find(|release| ranges.iter().all(|range| range.satisfies(&release.version)))
    }

    /// Number of distinct skill names
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// True if the catalog has no skills
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl FromIterator<SkillRelease> for Catalog {
    fn from_iter<I: IntoIterator<Item = SkillRelease>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for release in iter {
            catalog.add_release(release);
        }
        catalog
    }
}
