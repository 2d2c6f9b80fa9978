//! Migration path planning between skill versions
//!
//! Migration steps are authored, not derived from semver distance: each
//! step is a known, tested transition between two specific versions. The
//! planner searches the step graph breadth-first and returns the shortest
//! hop sequence, or fails naming the unreachable target. It never guesses
//! or skips steps.

use crate::domain::Version;
use crate::error::MigrationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// A known transition between two specific versions of one skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStep {
    /// Version the step starts from
    pub from: Version,
    /// Version the step ends at
    pub to: Version,
    /// What the step does
    #[serde(default)]
    pub description: String,
}

impl MigrationStep {
    /// Creates a new migration step
    pub fn new(from: Version, to: Version, description: impl Into<String>) -> Self {
        Self {
            from,
            to,
            description: description.into(),
        }
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{} -> {}", self.from, self.to)
        } else {
            write!(f, "{} -> {}: {}", self.from, self.to, self.description)
        }
    }
}

/// An ordered step sequence where each step starts where the previous one
/// ended
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MigrationPath {
    /// The steps to apply, in order
    pub steps: Vec<MigrationStep>,
}

impl MigrationPath {
    /// The empty path (current version already is the target)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if no steps are needed
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Plans the shortest migration path from `from` to `to` over authored
/// steps.
///
/// Returns an empty path when `from == to`. Neighbors are expanded in
/// ascending version order so equal-length paths resolve identically
/// across runs.
pub fn plan(
    skill: &str,
    steps: &[MigrationStep],
    from: &Version,
    to: &Version,
) -> Result<MigrationPath, MigrationError> {
    if from == to {
        return Ok(MigrationPath::empty());
    }

    // Step graph: from-version -> steps leaving it, sorted by target
    let mut outgoing: BTreeMap<&Version, Vec<&MigrationStep>> = BTreeMap::new();
    for step in steps {
        outgoing.entry(&step.from).or_default().push(step);
    }
    for targets in outgoing.values_mut() {
        targets.sort_by(|a, b| a.to.cmp(&b.to));
    }

    let mut queue: VecDeque<&Version> = VecDeque::new();
    let mut visited: BTreeSet<&Version> = BTreeSet::new();
    let mut came_from: BTreeMap<&Version, &MigrationStep> = BTreeMap::new();

    queue.push_back(from);
    visited.insert(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            break;
        }
        let Some(next_steps) = outgoing.get(current) else {
            continue;
        };
        for &step in next_steps {
            if visited.insert(&step.to) {
                came_from.insert(&step.to, step);
                queue.push_back(&step.to);
            }
        }
    }

    if !came_from.contains_key(to) {
        return Err(MigrationError::NoPath {
            skill: skill.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    // Walk predecessors back from the target
    let mut path: Vec<MigrationStep> = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let step = came_from[cursor];
        path.push(step.clone());
        cursor = &step.from;
    }
    path.reverse();
    Ok(MigrationPath { steps: path })
}
