//! Tree rendering of a resolved dependency graph
//!
//! Draws the plan as a forest rooted at skills nothing depends on, with
//! box-drawing connectors. Shared dependencies appear once per depender;
//! the plan is acyclic so the walk always terminates.

use crate::resolver::ResolutionPlan;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// Renders the resolved dependency tree to a writer
pub fn render_tree(
    plan: &ResolutionPlan,
    color: bool,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    let mut children: BTreeMap<&str, Vec<(&str, bool)>> = BTreeMap::new();
    let mut has_incoming: BTreeSet<&str> = BTreeSet::new();
    for edge in &plan.edges {
        children
            .entry(edge.depender.as_str())
            .or_default()
            .push((edge.name.as_str(), edge.optional));
        has_incoming.insert(edge.name.as_str());
    }
    for targets in children.values_mut() {
        targets.sort();
        targets.dedup();
    }

    // Forest roots: skills no retained edge points at, in name order
    let mut roots: Vec<&str> = plan
        .entries
        .iter()
        .map(|entry| entry.name.as_str())
        .filter(|name| !has_incoming.contains(name))
        .collect();
    roots.sort_unstable();

    for root in roots {
        render_node(plan, &children, root, false, "", "", color, writer)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render_node(
    plan: &ResolutionPlan,
    children: &BTreeMap<&str, Vec<(&str, bool)>>,
    name: &str,
    optional: bool,
    prefix: &str,
    connector: &str,
    color: bool,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    let version = plan
        .version_of(name)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string());
    let optional_marker = if optional { " (optional)" } else { "" };
    let line = if color {
        format!("{} {}{}", name, version.dimmed(), optional_marker.dimmed())
    } else {
        format!("{} {}{}", name, version, optional_marker)
    };
    writeln!(writer, "{}{}{}", prefix, connector, line)?;

    let Some(targets) = children.get(name) else {
        return Ok(());
    };
    let child_prefix = format!(
        "{}{}",
        prefix,
        match connector {
            "└── " => "    ",
            "├── " => "│   ",
            _ => "",
        }
    );

    for (index, (child, child_optional)) in targets.iter().enumerate() {
        let last = index == targets.len() - 1;
        let child_connector = if last { "└── " } else { "├── " };
        render_node(
            plan,
            children,
            child,
            *child_optional,
            &child_prefix,
            child_connector,
            color,
            writer,
        )?;
    }
    Ok(())
}
