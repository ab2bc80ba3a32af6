//! Reconstruction of the reporting tree from a flat roster.
//!
//! The tree has four layers: the organisation root, one node per business
//! line, one node per role held by the line's top-level members, and below
//! each of those the recursive reporting chain of every top-level member.
//! Chains only follow managers inside the same line.

use crate::employee::{Employee, Roster};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Organisation name used for the root label unless another is configured.
pub const DEFAULT_ORG_NAME: &str = "QUICK";

/// What a node in the chart stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Line,
    RoleGroup,
    Member,
    /// A manager reached twice along the same descent path
    Cycle,
    /// A manager code that matches no employee
    MissingManager,
}

/// One position in the chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, used to carry expand/collapse state across rebuilds
    pub key: String,

    /// Display text
    pub label: String,

    pub kind: NodeKind,

    pub children: Vec<Node>,

    /// For members this is their own salary only; grouping nodes aggregate
    pub total_salary: f64,

    /// Direct reports for members, member count for grouping nodes
    pub direct_count: usize,

    /// Distance from the local root (line nodes are 0)
    pub depth: u32,
}

impl Node {
    fn sentinel(key: String, label: String, kind: NodeKind, depth: u32) -> Self {
        Node {
            key,
            label,
            kind,
            children: Vec::new(),
            total_salary: 0.0,
            direct_count: 0,
            depth,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.kind, NodeKind::Cycle | NodeKind::MissingManager)
    }

    /// Text shown on a member card: the name part of `title – name`.
    /// Other nodes show their whole label.
    pub fn display_name(&self) -> &str {
        match self.kind {
            NodeKind::Member => self
                .label
                .split_once('–')
                .map(|(_, name)| name.trim())
                .unwrap_or(self.label.as_str()),
            _ => self.label.as_str(),
        }
    }

    /// Depth-first search for the node with the given key.
    pub fn find(&self, key: &str) -> Option<&Node> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

fn chain_key(manager_id: &str, line: &str) -> String {
    format!("{}-{}", manager_id, line)
}

/// Builds the chart for one roster snapshot.
///
/// The builder borrows the roster and never mutates it; building twice from
/// the same roster yields identical trees.
pub struct HierarchyBuilder<'a> {
    roster: &'a Roster,
    by_id: HashMap<&'a str, &'a Employee>,
    org_name: String,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        HierarchyBuilder {
            roster,
            by_id: roster.index(),
            org_name: DEFAULT_ORG_NAME.to_string(),
        }
    }

    pub fn with_org_name(mut self, org_name: impl Into<String>) -> Self {
        self.org_name = org_name.into();
        self
    }

    /// Build the reporting chain below `manager_id` inside `line`.
    ///
    /// `visited` holds the composite keys of the ancestors on the current
    /// path. Each child recursion gets its own extended copy, so siblings
    /// never see each other's markers.
    ///
    /// Reaching a key already on the path yields a terminal cycle node and an
    /// unknown manager code yields a terminal "manager not found" node. Both
    /// carry no salary and no children.
    pub fn build_chain(
        &self,
        manager_id: &str,
        line: &str,
        visited: &HashSet<String>,
        depth: u32,
    ) -> Node {
        let key = chain_key(manager_id, line);
        if visited.contains(&key) {
            log::warn!("reporting cycle through {} in line {}", manager_id, line);
            let label = format!("⚠ Cycle detected ({})", manager_id);
            return Node::sentinel(key, label, NodeKind::Cycle, depth);
        }

        let Some(manager) = self.by_id.get(manager_id) else {
            log::warn!("manager {} not found in line {}", manager_id, line);
            let label = format!("⚠ Manager not found ({})", manager_id);
            return Node::sentinel(key, label, NodeKind::MissingManager, depth);
        };

        let mut path = visited.clone();
        path.insert(key.clone());

        let children: Vec<Node> = self
            .roster
            .iter()
            .filter(|e| e.manager_id == manager_id && e.line == line)
            .map(|sub| self.build_chain(&sub.id, line, &path, depth + 1))
            .collect();

        Node {
            key,
            label: format!("{} – {}", manager.title, manager.name),
            kind: NodeKind::Member,
            direct_count: children.len(),
            children,
            total_salary: manager.salary,
            depth,
        }
    }

    /// Build the node for one business line.
    ///
    /// Top-level members are those without a manager or whose manager is not
    /// part of this line. They are grouped by title; each role group holds the
    /// chains of its members and is worth the members' own salaries. Groups
    /// are ordered by that amount, highest first, keeping first-seen order on
    /// ties. The line itself aggregates every member of the line.
    pub fn group_line(&self, line: &str) -> Node {
        let members: Vec<&Employee> = self.roster.iter().filter(|e| e.line == line).collect();
        let ids: HashSet<&str> = members.iter().map(|e| e.id.as_str()).collect();

        let mut roles: Vec<(&str, Vec<&Employee>)> = Vec::new();
        for e in members
            .iter()
            .copied()
            .filter(|e| !e.has_manager() || !ids.contains(e.manager_id.as_str()))
        {
            match roles.iter().position(|(title, _)| *title == e.title) {
                Some(i) => roles[i].1.push(e),
                None => roles.push((e.title.as_str(), vec![e])),
            }
        }

        let mut groups: Vec<Node> = roles
            .into_iter()
            .map(|(role, group)| Node {
                key: format!("{}-{}", line, role),
                label: format!("{} ({})", role, group.len()),
                kind: NodeKind::RoleGroup,
                children: group
                    .iter()
                    .map(|e| self.build_chain(&e.id, line, &HashSet::new(), 1))
                    .collect(),
                total_salary: group.iter().map(|e| e.salary).sum(),
                direct_count: group.len(),
                depth: 1,
            })
            .collect();

        groups.sort_by(|a, b| b.total_salary.total_cmp(&a.total_salary));

        Node {
            key: line.to_string(),
            label: format!("{} ({} members)", line.to_uppercase(), members.len()),
            kind: NodeKind::Line,
            children: groups,
            total_salary: members.iter().map(|e| e.salary).sum(),
            direct_count: members.len(),
            depth: 0,
        }
    }

    /// Build the organisation root: one child per real business line, minus
    /// lines without members or without any salary, richest line first.
    pub fn build_root(&self) -> Node {
        let mut lines: Vec<Node> = self
            .roster
            .lines()
            .into_iter()
            .map(|line| self.group_line(line))
            .filter(|node| node.direct_count > 0 && node.total_salary > 0.0)
            .collect();

        lines.sort_by(|a, b| b.total_salary.total_cmp(&a.total_salary));

        let staffed: Vec<&Employee> = self.roster.iter().filter(|e| e.has_line()).collect();

        Node {
            key: self.org_name.to_lowercase(),
            label: format!(
                "{} ({} members)",
                self.org_name.to_uppercase(),
                staffed.len()
            ),
            kind: NodeKind::Root,
            children: lines,
            total_salary: staffed.iter().fold(0.0, |acc, e| acc + e.salary),
            direct_count: staffed.len(),
            depth: 0,
        }
    }
}

/// Build the chart for a roster, or nothing while no data has arrived.
pub fn build_tree(roster: &Roster) -> Option<Node> {
    build_tree_named(roster, DEFAULT_ORG_NAME)
}

/// Same as [`build_tree`] with a custom organisation name on the root.
pub fn build_tree_named(roster: &Roster, org_name: &str) -> Option<Node> {
    if roster.is_empty() {
        return None;
    }

    let root = HierarchyBuilder::new(roster)
        .with_org_name(org_name)
        .build_root();
    log::info!(
        "built chart: {} lines, {} nodes from {} employees",
        root.children.len(),
        root.count(),
        roster.len()
    );
    Some(root)
}
