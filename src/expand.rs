use crate::hierarchy::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which chart nodes are open, keyed by node key.
///
/// The state lives outside the builder and is never pruned, so a node keeps
/// its open/closed state across rebuilds as long as its key is unchanged.
/// Callers only toggle keys that exist in the current chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandState {
    expanded: HashMap<String, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys start collapsed.
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    /// Flip one key and return its new state.
    pub fn toggle(&mut self, key: &str) -> bool {
        let open = !self.is_expanded(key);
        self.expanded.insert(key.to_string(), open);
        open
    }

    /// Open or close every line and role group of the chart.
    ///
    /// Replaces the whole map, so member nodes fall back to collapsed.
    pub fn set_all(&mut self, root: &Node, open: bool) {
        let mut expanded = HashMap::new();
        for line in &root.children {
            expanded.insert(line.key.clone(), open);
            for role in &line.children {
                expanded.insert(role.key.clone(), open);
            }
        }
        self.expanded = expanded;
    }

    /// Number of keys with a recorded state, open or closed.
    pub fn tracked_keys(&self) -> usize {
        self.expanded.len()
    }
}
