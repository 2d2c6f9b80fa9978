//! Dependency resolver
//!
//! This module provides:
//! - Catalog of available skill releases
//! - Single-version-per-name resolution with deterministic output
//! - Conflict diagnostics naming every requester
//! - Health checking of resolved plans
//!
//! The resolver walks the catalog from a set of roots, accumulates every
//! inbound constraint per skill name, and selects the highest release
//! satisfying all of them. Accumulated ranges are never retracted: the
//! result is a valid plan or a precise conflict report, not a globally
//! optimal assignment.

mod catalog;
pub mod health;

pub use catalog::Catalog;

use crate::domain::{Version, VersionRange};
use crate::error::{MissingDependency, Requester, ResolveError, VersionConflict};
use crate::graph::DependencyGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::warn;

/// One chosen skill version, in load order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Skill name
    pub name: String,
    /// Chosen version
    pub version: Version,
}

/// A dependency edge retained in the resolved plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEdge {
    /// Name of the depending skill
    pub depender: String,
    /// Name of the required skill
    pub name: String,
    /// Range the required skill must satisfy
    pub range: VersionRange,
    /// Whether the edge is optional
    pub optional: bool,
}

/// A dropped optional dependency, annotated on the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// Name of the skill that declared the dependency
    pub depender: String,
    /// Name of the dropped dependency
    pub name: String,
    /// Why the dependency was dropped
    pub reason: String,
}

/// The resolver output: chosen versions in load order plus the retained
/// edges and any dropped-optional warnings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPlan {
    /// Chosen versions, dependencies before dependers
    pub entries: Vec<PlanEntry>,
    /// Dependency edges satisfied by the plan
    pub edges: Vec<ResolvedEdge>,
    /// Optional dependencies dropped during resolution
    pub warnings: Vec<PlanWarning>,
}

impl ResolutionPlan {
    /// The version chosen for a name, if the plan includes it
    pub fn version_of(&self, name: &str) -> Option<&Version> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.version)
    }

    /// True if nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One accumulated inbound requirement on a skill name
#[derive(Debug, Clone)]
struct Inbound {
    depender: String,
    range: VersionRange,
    optional: bool,
}

impl Inbound {
    fn requester(&self) -> Requester {
        Requester {
            depender: self.depender.clone(),
            range: self.range.to_string(),
        }
    }
}

/// Resolves a catalog from the given roots into a plan.
///
/// Deterministic: the same catalog and roots always produce an identical
/// plan. Names are processed in sorted order and no hash-map iteration
/// order is relied upon.
pub fn resolve(catalog: &Catalog, roots: &[String]) -> Result<ResolutionPlan, ResolveError> {
    let mut root_names: Vec<String> = roots.to_vec();
    root_names.sort();
    root_names.dedup();

    for root in &root_names {
        if !catalog.contains(root) {
            return Err(ResolveError::Missing(MissingDependency {
                name: root.clone(),
                requesters: Vec::new(),
            }));
        }
    }

    let mut inbound: BTreeMap<String, Vec<Inbound>> = BTreeMap::new();
    let mut chosen: BTreeMap<String, Version> = BTreeMap::new();
    let mut worklist: BTreeSet<String> = root_names.iter().cloned().collect();

    // Walk to a fixpoint: selection for a name is revisited whenever a new
    // inbound requirement arrives for it.
    while let Some(name) = worklist.pop_first() {
        let requesters = inbound.get(&name).cloned().unwrap_or_default();

        if !catalog.contains(&name) {
            let required: Vec<Requester> = requesters
                .iter()
                .filter(|i| !i.optional)
                .map(Inbound::requester)
                .collect();
            if !required.is_empty() {
                return Err(ResolveError::Missing(MissingDependency {
                    name,
                    requesters: required,
                }));
            }
            // Optional-only requesters: the edge is dropped during plan
            // assembly below.
            continue;
        }

        let all_ranges: Vec<&VersionRange> = requesters.iter().map(|i| &i.range).collect();
        let selected = match catalog.highest_satisfying(&name, &all_ranges) {
            Some(release) => release,
            None => {
                // A failing optional range drops its edge instead of
                // aborting; retry against required ranges only.
                let required_ranges: Vec<&VersionRange> = requesters
                    .iter()
                    .filter(|i| !i.optional)
                    .map(|i| &i.range)
                    .collect();
                match catalog.highest_satisfying(&name, &required_ranges) {
                    Some(release) => release,
                    None => {
                        let available: Vec<String> = catalog
                            .releases(&name)
                            .iter()
                            .map(|r| r.version.to_string())
                            .collect();
                        return Err(ResolveError::Conflict(VersionConflict {
                            name: name.clone(),
                            requesters: requesters
                                .iter()
                                .filter(|i| !i.optional)
                                .map(Inbound::requester)
                                .collect(),
                            reason: format!("available versions: {}", available.join(", ")),
                        }));
                    }
                }
            }
        };

        let changed = chosen.get(&name) != Some(&selected.version);
        chosen.insert(name.clone(), selected.version.clone());
        if !changed {
            continue;
        }

        for dep in &selected.dependencies {
            let entries = inbound.entry(dep.name.clone()).or_default();
            let already_recorded = entries.iter().any(|i| {
                i.depender == name && i.range == dep.range && i.optional == dep.optional
            });
            if !already_recorded {
                entries.push(Inbound {
                    depender: name.clone(),
                    range: dep.range.clone(),
                    optional: dep.optional,
                });
                worklist.insert(dep.name.clone());
            } else if !chosen.contains_key(&dep.name) {
                worklist.insert(dep.name.clone());
            }
        }
    }

    assemble_plan(catalog, &chosen, &root_names)
}

/// Reconciles final selections into edges, drops unsatisfiable or
/// cycle-closing optional edges, prunes skills no longer reachable from
/// the roots, and computes the load order.
fn assemble_plan(
    catalog: &Catalog,
    chosen: &BTreeMap<String, Version>,
    roots: &[String],
) -> Result<ResolutionPlan, ResolveError> {
    let mut warnings: Vec<PlanWarning> = Vec::new();
    let mut candidate_edges: Vec<ResolvedEdge> = Vec::new();

    for (name, version) in chosen {
        let release = catalog
            .release(name, version)
            .expect("chosen version comes from the catalog");
        for dep in &release.dependencies {
            match chosen.get(&dep.name) {
                None => {
                    // A required dependency always gets chosen or aborts the
                    // walk, so an unchosen target is a dropped optional.
                    push_warning(
                        &mut warnings,
                        &dep.depender,
                        &dep.name,
                        "not present in the catalog".to_string(),
                    );
                }
                Some(version) if !dep.range.satisfies(version) => {
                    if dep.optional {
                        push_warning(
                            &mut warnings,
                            &dep.depender,
                            &dep.name,
                            format!("resolved version {} does not satisfy {}", version, dep.range),
                        );
                    } else {
                        return Err(ResolveError::Conflict(VersionConflict {
                            name: dep.name.clone(),
                            requesters: vec![Requester {
                                depender: dep.depender.clone(),
                                range: dep.range.to_string(),
                            }],
                            reason: format!("selected version {} fell outside the range", version),
                        }));
                    }
                }
                Some(_) => candidate_edges.push(ResolvedEdge {
                    depender: dep.depender.clone(),
                    name: dep.name.clone(),
                    range: dep.range.clone(),
                    optional: dep.optional,
                }),
            }
        }
    }

    // Required edges must be acyclic before optional edges are considered.
    let mut required_graph = DependencyGraph::new();
    for (name, version) in chosen {
        required_graph.add_node(name.clone(), version.clone());
    }
    for edge in candidate_edges.iter().filter(|e| !e.optional) {
        required_graph.add_edge(
            edge.depender.clone(),
            edge.name.clone(),
            edge.range.clone(),
            false,
        );
    }
    if let Some(cycle) = required_graph.detect_cycles() {
        return Err(ResolveError::Cycle(crate::error::CircularDependency {
            cycle,
        }));
    }

    // Accept optional edges one at a time in sorted order, dropping any
    // that would close a cycle through already-accepted edges.
    let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for edge in candidate_edges.iter().filter(|e| !e.optional) {
        adjacency
            .entry(edge.depender.clone())
            .or_default()
            .insert(edge.name.clone());
    }
    let mut optional_edges: Vec<&ResolvedEdge> =
        candidate_edges.iter().filter(|e| e.optional).collect();
    optional_edges.sort_by(|a, b| (&a.depender, &a.name).cmp(&(&b.depender, &b.name)));
    let mut dropped: BTreeSet<(String, String)> = BTreeSet::new();
    for edge in optional_edges {
        if reaches(&adjacency, &edge.name, &edge.depender) {
            push_warning(
                &mut warnings,
                &edge.depender,
                &edge.name,
                "would create a dependency cycle".to_string(),
            );
            dropped.insert((edge.depender.clone(), edge.name.clone()));
        } else {
            adjacency
                .entry(edge.depender.clone())
                .or_default()
                .insert(edge.name.clone());
        }
    }

    let mut edges: Vec<ResolvedEdge> = candidate_edges
        .into_iter()
        .filter(|e| !dropped.contains(&(e.depender.clone(), e.name.clone())))
        .collect();

    // Dropped edges can leave skills with no remaining path from a root;
    // those must not be loaded.
    let mut retained: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for edge in &edges {
        retained
            .entry(edge.depender.clone())
            .or_default()
            .insert(edge.name.clone());
    }
    let mut reachable: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<&str> = roots.iter().map(String::as_str).collect();
    for root in roots {
        reachable.insert(root.clone());
    }
    while let Some(current) = queue.pop_front() {
        if let Some(next) = retained.get(current) {
            for neighbor in next {
                if reachable.insert(neighbor.clone()) {
                    queue.push_back(neighbor.as_str());
                }
            }
        }
    }
    edges.retain(|e| reachable.contains(&e.depender));
    warnings.retain(|w| reachable.contains(&w.depender));

    let mut graph = DependencyGraph::new();
    for (name, version) in chosen {
        if reachable.contains(name) {
            graph.add_node(name.clone(), version.clone());
        }
    }
    for edge in &edges {
        graph.add_edge(
            edge.depender.clone(),
            edge.name.clone(),
            edge.range.clone(),
            edge.optional,
        );
    }
    let order = graph.topological_order().map_err(ResolveError::Cycle)?;

    let entries: Vec<PlanEntry> = order
        .into_iter()
        .filter_map(|name| {
            chosen.get(&name).map(|version| PlanEntry {
                version: version.clone(),
                name,
            })
        })
        .collect();

    Ok(ResolutionPlan {
        entries,
        edges,
        warnings,
    })
}

fn push_warning(warnings: &mut Vec<PlanWarning>, depender: &str, name: &str, reason: String) {
    if warnings
        .iter()
        .any(|w| w.depender == depender && w.name == name)
    {
        return;
    }
    warn!(depender, dependency = name, %reason, "optional dependency dropped");
    warnings.push(PlanWarning {
        depender: depender.to_string(),
        name: name.to_string(),
        reason,
    });
}

/// Breadth-first reachability over an adjacency map
fn reaches(adjacency: &BTreeMap<String, BTreeSet<String>>, from: &str, to: &str) -> bool {
    if from == to {
        return true;
    }
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    queue.push_back(from);
    seen.insert(from);
    while let Some(current) = queue.pop_front() {
        if let Some(next) = adjacency.get(current) {
            for neighbor in next {
                if neighbor == to {
                    return true;
                }
                if seen.insert(neighbor.as_str()) {
                    queue.push_back(neighbor.as_str());
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SkillDependency, SkillRelease};

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    fn range(text: &str) -> VersionRange {
        VersionRange::parse(text).unwrap()
    }

    fn release(name: &str, version: &str, deps: &[(&str, &str, bool)]) -> SkillRelease {
        let dependencies = deps
            .iter()
            .map(|(dep, constraint, optional)| {
                SkillDependency::new(name, *dep, range(constraint), *optional).unwrap()
            })
            .collect();
        SkillRelease::new(name, v(version)).with_dependencies(dependencies)
    }

    fn roots(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_resolve_single_skill() {
        let catalog: Catalog = [release("util", "1.0.0", &[])].into_iter().collect();
        let plan = resolve(&catalog, &roots(&["util"])).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.version_of("util"), Some(&v("1.0.0")));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_resolve_picks_highest_available() {
        let catalog: Catalog = [
            release("util", "1.0.0", &[]),
            release("util", "1.4.0", &[]),
            release("util", "2.1.0", &[]),
        ]
        .into_iter()
        .collect();
        let plan = resolve(&catalog, &roots(&["util"])).unwrap();
        assert_eq!(plan.version_of("util"), Some(&v("2.1.0")));
    }

    #[test]
    fn test_resolve_chain_orders_dependencies_first() {
        let catalog: Catalog = [
            release("web", "1.0.0", &[("http", "^1.0.0", false)]),
            release("http", "1.2.0", &[("util", ">=0.5.0", false)]),
            release("util", "0.9.0", &[]),
        ]
        .into_iter()
        .collect();

        let plan = resolve(&catalog, &roots(&["web"])).unwrap();
        let order: Vec<&str> = plan.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["util", "http", "web"]);
    }

    #[test]
    fn test_resolve_diamond_order() {
        let catalog: Catalog = [
            release("a", "1.0.0", &[("b", "*", false), ("c", "*", false)]),
            release("b", "1.0.0", &[("d", "*", false)]),
            release("c", "1.0.0", &[("d", "*", false)]),
            release("d", "1.0.0", &[]),
        ]
        .into_iter()
        .collect();

        let plan = resolve(&catalog, &roots(&["a"])).unwrap();
        let order: Vec<&str> = plan.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_resolve_intersects_requester_ranges() {
        let catalog: Catalog = [
            release("a", "1.0.0", &[("x", "^1.0.0", false)]),
            release("z", "1.0.0", &[("x", "<1.5.0", false)]),
            release("x", "1.0.0", &[]),
            release("x", "1.5.0", &[]),
            release("x", "1.9.0", &[]),
        ]
        .into_iter()
        .collect();

        // "a" is processed before "z", so x is first selected at 1.9.0 and
        // re-selected once z's tighter range arrives.
        let plan = resolve(&catalog, &roots(&["a", "z"])).unwrap();
        assert_eq!(plan.version_of("x"), Some(&v("1.0.0")));
    }

    #[test]
    fn test_resolve_conflict_names_every_requester() {
        let catalog: Catalog = [
            release("p", "1.0.0", &[("x", ">=1.0.0,<2.0.0", false)]),
            release("q", "1.0.0", &[("x", ">=2.0.0", false)]),
            release("x", "1.0.0", &[]),
            release("x", "2.0.0", &[]),
        ]
        .into_iter()
        .collect();

        let err = resolve(&catalog, &roots(&["p", "q"])).unwrap_err();
        match err {
            ResolveError::Conflict(conflict) => {
                assert_eq!(conflict.name, "x");
                let dependers: Vec<&str> =
                    conflict.requesters.iter().map(|r| r.depender.as_str()).collect();
                assert_eq!(dependers, vec!["p", "q"]);
                assert!(conflict.reason.contains("1.0.0"));
                assert!(conflict.reason.contains("2.0.0"));
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_missing_required_dependency() {
        let catalog: Catalog = [release("p", "1.0.0", &[("ghost", ">=1.0.0", false)])]
            .into_iter()
            .collect();

        let err = resolve(&catalog, &roots(&["p"])).unwrap_err();
        match err {
            ResolveError::Missing(missing) => {
                assert_eq!(missing.name, "ghost");
                assert_eq!(missing.requesters.len(), 1);
                assert_eq!(missing.requesters[0].depender, "p");
            }
            other => panic!("expected missing dependency, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unknown_root() {
        let catalog = Catalog::new();
        let err = resolve(&catalog, &roots(&["ghost"])).unwrap_err();
        match err {
            ResolveError::Missing(missing) => {
                assert_eq!(missing.name, "ghost");
                assert!(missing.requesters.is_empty());
            }
            other => panic!("expected missing root, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_drops_missing_optional_with_warning() {
        let catalog: Catalog = [release("p", "1.0.0", &[("cache", "*", true)])]
            .into_iter()
            .collect();

        let plan = resolve(&catalog, &roots(&["p"])).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].depender, "p");
        assert_eq!(plan.warnings[0].name, "cache");
        assert!(plan.warnings[0].reason.contains("not present"));
    }

    #[test]
    fn test_resolve_drops_unsatisfiable_optional_with_warning() {
        let catalog: Catalog = [
            release("p", "1.0.0", &[("x", ">=2.0.0", false)]),
            release("q", "1.0.0", &[("x", "<2.0.0", true)]),
            release("x", "2.0.0", &[]),
        ]
        .into_iter()
        .collect();

        let plan = resolve(&catalog, &roots(&["p", "q"])).unwrap();
        assert_eq!(plan.version_of("x"), Some(&v("2.0.0")));
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].depender, "q");
        assert!(plan.warnings[0].reason.contains("does not satisfy"));
        // The dropped edge is not part of the plan
        assert!(!plan.edges.iter().any(|e| e.depender == "q" && e.name == "x"));
    }

    #[test]
    fn test_resolve_prunes_skill_only_reachable_via_dropped_edge() {
        // x exists only at 2.0.0 and is wanted only through an optional
        // edge that 2.0.0 fails; dropping the edge must also drop x.
        let catalog: Catalog = [
            release("q", "1.0.0", &[("x", "<2.0.0", true)]),
            release("x", "2.0.0", &[]),
        ]
        .into_iter()
        .collect();

        let plan = resolve(&catalog, &roots(&["q"])).unwrap();
        let order: Vec<&str> = plan.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["q"]);
        assert!(plan.version_of("x").is_none());
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_resolve_cycle_reports_path() {
        let catalog: Catalog = [
            release("a", "1.0.0", &[("b", "*", false)]),
            release("b", "1.0.0", &[("c", "*", false)]),
            release("c", "1.0.0", &[("a", "*", false)]),
        ]
        .into_iter()
        .collect();

        let err = resolve(&catalog, &roots(&["a"])).unwrap_err();
        match err {
            ResolveError::Cycle(cycle) => {
                assert_eq!(cycle.cycle, vec!["a", "b", "c"]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_drops_cycle_closing_optional_edge() {
        let catalog: Catalog = [
            release("a", "1.0.0", &[("b", "*", false)]),
            release("b", "1.0.0", &[("a", "*", true)]),
        ]
        .into_iter()
        .collect();

        let plan = resolve(&catalog, &roots(&["a"])).unwrap();
        let order: Vec<&str> = plan.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].reason.contains("cycle"));
    }

    #[test]
    fn test_resolve_optional_dependency_is_kept_when_satisfiable() {
        let catalog: Catalog = [
            release("p", "1.0.0", &[("cache", "^1.0.0", true)]),
            release("cache", "1.2.0", &[]),
        ]
        .into_iter()
        .collect();

        let plan = resolve(&catalog, &roots(&["p"])).unwrap();
        assert_eq!(plan.version_of("cache"), Some(&v("1.2.0")));
        assert!(plan.warnings.is_empty());
        let order: Vec<&str> = plan.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["cache", "p"]);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let build = || -> Catalog {
            [
                release("web", "1.0.0", &[("http", "^1.0.0", false), ("parser", "*", false)]),
                release("http", "1.0.0", &[("util", "*", false)]),
                release("http", "1.3.0", &[("util", "*", false)]),
                release("parser", "0.2.0", &[("util", "*", false)]),
                release("util", "1.0.0", &[]),
                release("util", "1.1.0", &[]),
            ]
            .into_iter()
            .collect()
        };

        let first = resolve(&build(), &roots(&["web"])).unwrap();
        let second = resolve(&build(), &roots(&["web"])).unwrap();
        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn test_plan_serde_round_trip() {
        let catalog: Catalog = [
            release("web", "1.0.0", &[("http", "^1.0.0", false)]),
            release("http", "1.2.0", &[]),
        ]
        .into_iter()
        .collect();

        let plan = resolve(&catalog, &roots(&["web"])).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let parsed: ResolutionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }
}
