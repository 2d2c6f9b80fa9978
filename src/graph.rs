//! Dependency graph over skill nodes
//!
//! This module provides:
//! - Adjacency-by-name graph construction from a flat edge list
//! - Cycle detection returning the ordered cycle path
//! - Deterministic topological ordering (Kahn's algorithm with
//!   lexicographic tie-breaks)
//!
//! Nodes are keyed by skill name; the single-version-per-name invariant
//! means a name identifies a node. Edges may be recorded before their
//! endpoints exist as nodes, so a graph can be built from manifests in any
//! order.

use crate::domain::{Version, VersionRange};
use crate::error::CircularDependency;
use std::collections::{BTreeMap, BTreeSet};

/// A node in the graph: one skill at one chosen version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Skill name
    pub name: String,
    /// Chosen version
    pub version: Version,
    /// Names this skill depends on
    pub outgoing: BTreeSet<String>,
    /// Names that depend on this skill
    pub incoming: BTreeSet<String>,
}

impl GraphNode {
    fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
        }
    }
}

/// A dependency edge, recorded before any version is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    /// Name of the depending skill
    pub depender: String,
    /// Name of the required skill
    pub name: String,
    /// Range the required skill must satisfy
    pub range: VersionRange,
    /// Whether the edge is optional
    pub optional: bool,
}

/// Directed dependency graph keyed by skill name
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the node for a skill name
    pub fn add_node(&mut self, name: impl Into<String>, version: Version) {
        let name = name.into();
        if let Some(node) = self.nodes.get_mut(&name) {
            node.version = version;
            return;
        }

        let mut node = GraphNode::new(name.clone(), version);
        for edge in &self.edges {
            if edge.depender == name && self.nodes.contains_key(&edge.name) {
                node.outgoing.insert(edge.name.clone());
            }
            if edge.name == name && self.nodes.contains_key(&edge.depender) {
                node.incoming.insert(edge.depender.clone());
            }
        }
        // Wire the reverse direction on already-present endpoints
        let nodes = &mut self.nodes;
        for edge in &self.edges {
            if edge.depender == name {
                if let Some(target) = nodes.get_mut(&edge.name) {
                    target.incoming.insert(name.clone());
                }
            }
            if edge.name == name {
                if let Some(source) = nodes.get_mut(&edge.depender) {
                    source.outgoing.insert(name.clone());
                }
            }
        }
        nodes.insert(name, node);
    }

    /// Records a dependency edge; neither endpoint needs to be a node yet
    pub fn add_edge(
        &mut self,
        depender: impl Into<String>,
        name: impl Into<String>,
        range: VersionRange,
        optional: bool,
    ) {
        let depender = depender.into();
        let name = name.into();
        if self.nodes.contains_key(&depender) && self.nodes.contains_key(&name) {
            if let Some(source) = self.nodes.get_mut(&depender) {
                source.outgoing.insert(name.clone());
            }
            if let Some(target) = self.nodes.get_mut(&name) {
                target.incoming.insert(depender.clone());
            }
        }
        self.edges.push(GraphEdge {
            depender,
            name,
            range,
            optional,
        });
    }

    /// Returns the node for a name, if present
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.get(name)
    }

    /// True if the graph holds a node for this name
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// All nodes in ascending name order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// All recorded edges in insertion order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no nodes have been added
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every vertex name: nodes plus any edge endpoint
    fn vertices(&self) -> BTreeSet<String> {
        let mut vertices: BTreeSet<String> = self.nodes.keys().cloned().collect();
        for edge in &self.edges {
            vertices.insert(edge.depender.clone());
            vertices.insert(edge.name.clone());
        }
        vertices
    }

    /// Forward adjacency (depender -> dependency), deduplicated and sorted
    fn adjacency(&self, include_optional: bool) -> BTreeMap<String, BTreeSet<String>> {
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for edge in &self.edges {
            if edge.optional && !include_optional {
                continue;
            }
            adjacency
                .entry(edge.depender.clone())
                .or_default()
                .insert(edge.name.clone());
        }
        adjacency
    }

    /// Detects a cycle among required edges across all components.
    ///
    /// Returns the ordered path from the first repeated vertex back to
    /// itself, so the caller can report an actionable cycle rather than a
    /// bare "cycle exists".
    pub fn detect_cycles(&self) -> Option<Vec<String>> {
        self.find_cycle(false)
    }

    fn find_cycle(&self, include_optional: bool) -> Option<Vec<String>> {
        let adjacency = self.adjacency(include_optional);
        let neighbors = |name: &str| -> Vec<String> {
            adjacency
                .get(name)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default()
        };

        let mut visited: BTreeSet<String> = BTreeSet::new();
        for start in self.vertices() {
            if visited.contains(&start) {
                continue;
            }
            // Iterative DFS with an explicit recursion stack; `on_path`
            // tracks the current path for cycle extraction.
            let mut stack: Vec<(String, Vec<String>, usize)> =
                vec![(start.clone(), neighbors(&start), 0)];
            let mut on_path: BTreeSet<String> = BTreeSet::new();
            on_path.insert(start.clone());
            visited.insert(start);

            loop {
                let next = match stack.last_mut() {
                    Some(frame) => {
                        if frame.2 < frame.1.len() {
                            let next = frame.1[frame.2].clone();
                            frame.2 += 1;
                            Some(next)
                        } else {
                            None
                        }
                    }
                    None => break,
                };

                match next {
                    Some(next) => {
                        if on_path.contains(&next) {
                            let pos = stack
                                .iter()
                                .position(|(name, _, _)| *name == next)
                                .expect("path member is on the stack");
                            return Some(
                                stack[pos..].iter().map(|(name, _, _)| name.clone()).collect(),
                            );
                        }
                        if !visited.contains(&next) {
                            visited.insert(next.clone());
                            on_path.insert(next.clone());
                            let next_neighbors = neighbors(&next);
                            stack.push((next, next_neighbors, 0));
                        }
                    }
                    None => {
                        let (name, _, _) = stack.pop().expect("loop guard");
                        on_path.remove(&name);
                    }
                }
            }
        }
        None
    }

    /// Computes the load order: every dependency precedes its dependers.
    ///
    /// Kahn's algorithm; ties among simultaneously ready vertices are
    /// broken by ascending lexicographic name so the order is reproducible
    /// across runs and implementations.
    pub fn topological_order(&self) -> Result<Vec<String>, CircularDependency> {
        if let Some(cycle) = self.detect_cycles() {
            return Err(CircularDependency { cycle });
        }

        let vertices = self.vertices();
        let adjacency = self.adjacency(true);

        // in-degree counts a vertex's unloaded dependencies; dependers are
        // unlocked as their dependencies are emitted.
        let mut in_degree: BTreeMap<&str, usize> = vertices.iter().map(|v| (v.as_str(), 0)).collect();
        let mut dependers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (depender, targets) in &adjacency {
            for target in targets {
                *in_degree.get_mut(depender.as_str()).expect("vertex known") += 1;
                dependers
                    .entry(target.as_str())
                    .or_default()
                    .insert(depender.as_str());
            }
        }

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order: Vec<String> = Vec::with_capacity(vertices.len());

        while let Some(name) = ready.iter().next().copied() {
            ready.remove(name);
            order.push(name.to_string());
            if let Some(unlocked) = dependers.get(name) {
                for &depender in unlocked {
                    let degree = in_degree.get_mut(depender).expect("vertex known");
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(depender);
                    }
                }
            }
        }

        if order.len() != vertices.len() {
            // Only reachable when optional edges close a cycle that the
            // required-edge pass cannot see.
            let cycle = self
                .find_cycle(true)
                .unwrap_or_else(|| vertices.into_iter().collect());
            return Err(CircularDependency { cycle });
        }
        Ok(order)
    }
}
