//! Render model for the chart page.
//!
//! Turns a built tree plus the current expand state into plain data a
//! template can walk without any logic: header totals, one card per line,
//! one card per role group, and the visible member rows flattened in
//! display order.

use crate::expand::ExpandState;
use crate::hierarchy::Node;
use crate::salary::format_salary;
use crate::style::{depth_border, depth_color, line_color, role_icon};
use serde::Serialize;

// Horizontal offset per depth level, in pixels
const INDENT_STEP: u32 = 10;

#[derive(Debug, Serialize)]
pub struct ChartView {
    pub title: String,
    pub member_count: usize,
    pub total_salary: String,
    pub lines: Vec<LineCard>,
}

#[derive(Debug, Serialize)]
pub struct LineCard {
    pub key: String,
    pub label: String,
    pub total_salary: String,
    pub color: &'static str,
    pub expanded: bool,
    pub roles: Vec<RoleCard>,
}

#[derive(Debug, Serialize)]
pub struct RoleCard {
    pub key: String,
    pub label: String,
    pub icon: &'static str,
    pub total_salary: String,
    pub background: &'static str,
    pub expanded: bool,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub key: String,
    pub name: String,
    pub salary: String,
    pub count: usize,
    pub depth: u32,
    pub indent: u32,
    pub background: &'static str,
    pub border: Option<&'static str>,
    pub sentinel: bool,
    pub expanded: bool,
    pub has_children: bool,
}

impl ChartView {
    pub fn build(root: &Node, state: &ExpandState) -> Self {
        let lines = root
            .children
            .iter()
            .map(|line| line_card(line, state))
            .collect();

        ChartView {
            title: root.key.to_uppercase(),
            member_count: root.direct_count,
            total_salary: format_salary(root.total_salary),
            lines,
        }
    }

    /// Total number of member rows currently visible.
    pub fn visible_rows(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|line| &line.roles)
            .map(|role| role.rows.len())
            .sum()
    }
}

fn line_card(line: &Node, state: &ExpandState) -> LineCard {
    let expanded = state.is_expanded(&line.key);
    let roles = if expanded {
        line.children
            .iter()
            .map(|role| role_card(role, state))
            .collect()
    } else {
        Vec::new()
    };

    LineCard {
        key: line.key.clone(),
        label: line.label.clone(),
        total_salary: format_salary(line.total_salary),
        color: line_color(&line.key),
        expanded,
        roles,
    }
}

fn role_card(role: &Node, state: &ExpandState) -> RoleCard {
    let expanded = state.is_expanded(&role.key);
    let mut rows = Vec::new();
    if expanded {
        for member in &role.children {
            push_rows(member, state, &mut rows);
        }
    }

    RoleCard {
        key: role.key.clone(),
        label: role.label.clone(),
        icon: role_icon(&role.label),
        total_salary: format_salary(role.total_salary),
        background: depth_color(role.depth),
        expanded,
        rows,
    }
}

fn push_rows(node: &Node, state: &ExpandState, rows: &mut Vec<RowView>) {
    let expanded = state.is_expanded(&node.key);
    rows.push(RowView {
        key: node.key.clone(),
        name: node.display_name().to_string(),
        salary: format_salary(node.total_salary),
        count: node.direct_count,
        depth: node.depth,
        indent: node.depth * INDENT_STEP,
        background: depth_color(node.depth),
        border: depth_border(node.depth),
        sentinel: node.is_sentinel(),
        expanded,
        has_children: !node.children.is_empty(),
    });

    if expanded {
        for child in &node.children {
            push_rows(child, state, rows);
        }
    }
}

/// Plain-text rendering of the whole tree, one node per line, indented by
/// nesting level. Used by the command-line tool.
pub fn outline(root: &Node) -> String {
    let mut out = String::new();
    write_outline(root, 0, &mut out);
    out
}

fn write_outline(node: &Node, level: usize, out: &mut String) {
    out.push_str(&"  ".repeat(level));
    out.push_str(&node.label);
    if !node.is_sentinel() {
        out.push_str(&format!(
            " – ${} [{}]",
            format_salary(node.total_salary),
            node.direct_count
        ));
    }
    out.push('\n');

    for child in &node.children {
        write_outline(child, level + 1, out);
    }
}
