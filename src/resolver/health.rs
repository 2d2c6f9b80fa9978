//! Health checking of resolved plans
//!
//! Re-validates that every dependency edge's range is still satisfied by
//! the version actually recorded in the plan. This catches drift
//! introduced between planning and use, such as a loader substituting a
//! different version after resolution. Read-only; the plan is never
//! mutated.

use crate::resolver::ResolutionPlan;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of checking one dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The recorded version satisfies the edge's range
    Satisfied,
    /// The dependency is present at a version outside the range
    VersionMismatch,
    /// The dependency is absent from the plan
    Missing,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Satisfied => "satisfied",
            HealthStatus::VersionMismatch => "version mismatch",
            HealthStatus::Missing => "missing",
        };
        write!(f, "{}", label)
    }
}

/// Health report for a single dependency edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyHealth {
    /// Name of the depending skill
    pub depender: String,
    /// Name of the required skill
    pub name: String,
    /// Check outcome
    pub status: HealthStatus,
    /// Human-readable detail
    pub detail: String,
}

impl DependencyHealth {
    /// True if this edge passed the check
    pub fn is_satisfied(&self) -> bool {
        self.status == HealthStatus::Satisfied
    }
}

impl fmt::Display for DependencyHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} ({})",
            self.depender, self.name, self.status, self.detail
        )
    }
}

/// Re-evaluates every edge of a plan against the versions it records
pub fn check(plan: &ResolutionPlan) -> Vec<DependencyHealth> {
    plan.edges
        .iter()
        .map(|edge| match plan.version_of(&edge.name) {
            None => DependencyHealth {
                depender: edge.depender.clone(),
                name: edge.name.clone(),
                status: HealthStatus::Missing,
                detail: format!("'{}' is not present in the plan", edge.name),
            },
            Some(version) if !edge.range.satisfies(version) => DependencyHealth {
                depender: edge.depender.clone(),
                name: edge.name.clone(),
                status: HealthStatus::VersionMismatch,
                detail: format!("version {} does not satisfy {}", version, edge.range),
            },
            Some(version) => DependencyHealth {
                depender: edge.depender.clone(),
                name: edge.name.clone(),
                status: HealthStatus::Satisfied,
                detail: format!("version {} satisfies {}", version, edge.range),
            },
        })
        .collect()
}

/// True if every edge in the report is satisfied
pub fn is_healthy(report: &[DependencyHealth]) -> bool {
    report.iter().all(DependencyHealth::is_satisfied)
}
