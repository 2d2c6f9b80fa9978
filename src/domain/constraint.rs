//! Version constraints and AND-combined constraint ranges
//!
//! Handles operator-qualified version expressions like:
//! - `1.2.3` / `=1.2.3` (exact)
//! - `>=1.0.0`, `>1.0.0`, `<2.0.0`, `<=2.0.0`
//! - `^1.2.3` (compatible release), `~1.2.3` (same minor)
//! - `>=1.0.0,<2.0.0` (AND range)

use crate::domain::Version;
use crate::error::VersionParseError;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Constraint operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintOp {
    /// Exact version match (`=` or no operator)
    Exact,
    /// Strictly greater (`>`)
    Greater,
    /// Greater or equal (`>=`)
    GreaterOrEqual,
    /// Strictly less (`<`)
    Less,
    /// Less or equal (`<=`)
    LessOrEqual,
    /// Compatible release (`^`): same leading non-zero component
    Caret,
    /// Approximate (`~`): same major.minor, patch may move forward
    Tilde,
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ConstraintOp::Exact => "=",
            ConstraintOp::Greater => ">",
            ConstraintOp::GreaterOrEqual => ">=",
            ConstraintOp::Less => "<",
            ConstraintOp::LessOrEqual => "<=",
            ConstraintOp::Caret => "^",
            ConstraintOp::Tilde => "~",
        };
        write!(f, "{}", token)
    }
}

/// A single operator + version test a candidate must pass
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    /// The constraint operator
    pub op: ConstraintOp,
    /// The version the operator is applied against
    pub version: Version,
}

impl Constraint {
    /// Creates a new constraint
    pub fn new(op: ConstraintOp, version: Version) -> Self {
        Self { op, version }
    }

    /// Parses constraint text: an optional leading operator followed by a
    /// version. Absence of an operator means exact match.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::invalid_constraint(
                text,
                "empty constraint",
            ));
        }

        // Two-character operators take precedence over their one-character
        // prefixes.
        let (op, rest) = if let Some(rest) = trimmed.strip_prefix(">=") {
            (ConstraintOp::GreaterOrEqual, rest)
        } else if let Some(rest) = trimmed.strip_prefix("<=") {
            (ConstraintOp::LessOrEqual, rest)
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            (ConstraintOp::Greater, rest)
        } else if let Some(rest) = trimmed.strip_prefix('<') {
            (ConstraintOp::Less, rest)
        } else if let Some(rest) = trimmed.strip_prefix('^') {
            (ConstraintOp::Caret, rest)
        } else if let Some(rest) = trimmed.strip_prefix('~') {
            (ConstraintOp::Tilde, rest)
        } else if let Some(rest) = trimmed.strip_prefix('=') {
            (ConstraintOp::Exact, rest)
        } else {
            (ConstraintOp::Exact, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(VersionParseError::invalid_constraint(
                trimmed,
                "missing version after operator",
            ));
        }

        let version = Version::parse(rest)?;
        Ok(Self::new(op, version))
    }

    /// Checks whether a candidate version satisfies this constraint
    pub fn satisfies(&self, candidate: &Version) -> bool {
        match self.op {
            ConstraintOp::Exact => candidate == &self.version,
            ConstraintOp::Greater => candidate > &self.version,
            ConstraintOp::GreaterOrEqual => candidate >= &self.version,
            ConstraintOp::Less => candidate < &self.version,
            ConstraintOp::LessOrEqual => candidate <= &self.version,
            ConstraintOp::Caret => {
                if self.version.major > 0 {
                    candidate.major == self.version.major && candidate >= &self.version
                } else {
                    // Zero-major versions make no stability promise across
                    // minors; restrict matching to the same minor.
                    candidate.major == 0
                        && candidate.minor == self.version.minor
                        && candidate >= &self.version
                }
            }
            ConstraintOp::Tilde => {
                candidate.major == self.version.major
                    && candidate.minor == self.version.minor
                    && candidate >= &self.version
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An exact constraint renders as the bare version
        match self.op {
            ConstraintOp::Exact => write!(f, "{}", self.version),
            op => write!(f, "{}{}", op, self.version),
        }
    }
}

/// An ordered set of constraints combined with AND semantics
///
/// A candidate version must satisfy every constraint in the range to
/// match. An empty range satisfies everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    constraints: Vec<Constraint>,
}

impl VersionRange {
    /// Creates a range from a list of constraints
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    /// Creates the empty range (matches any version)
    pub fn any() -> Self {
        Self::default()
    }

    /// Creates a range holding a single exact constraint
    pub fn exact(version: Version) -> Self {
        Self::new(vec![Constraint::new(ConstraintOp::Exact, version)])
    }

    /// Parses comma-separated constraint text (`>=1.0.0,<2.0.0`).
    ///
    /// `*` and the empty string parse to the empty range.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::any());
        }
        let constraints = trimmed
            .split(',')
            .map(Constraint::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(constraints))
    }

    /// Checks whether a candidate satisfies every constraint in the range
    pub fn satisfies(&self, candidate: &Version) -> bool {
        self.constraints.iter().all(|c| c.satisfies(candidate))
    }

    /// Returns true if this is the empty (match-anything) range
    pub fn is_any(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The constraints in declaration order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl From<Constraint> for VersionRange {
    fn from(constraint: Constraint) -> Self {
        Self::new(vec![constraint])
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            return write!(f, "*");
        }
        let parts: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        VersionRange::parse(&text).map_err(D::Error::custom)
    }
}
