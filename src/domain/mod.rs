//! Core domain models for skilldep
//!
//! This module contains the fundamental types used throughout the
//! application:
//! - Semantic version values and ordering
//! - Constraint operators and AND-combined ranges
//! - Dependency declarations between skills
//! - Skill release records

mod constraint;
mod dependency;
mod skill;
mod version;

pub use constraint::{Constraint, ConstraintOp, VersionRange};
pub use dependency::SkillDependency;
pub use skill::SkillRelease;
pub use version::{Prerelease, PrereleaseKind, Version};
