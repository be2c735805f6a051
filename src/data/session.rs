use std::collections::HashSet;

use super::book::QuestId;

/// Per-session browse state shared across engine invocations: the selected
/// quest, the expand/collapse set for material-tree nodes, and the totals
/// mode toggle. The tree walker reads the expand set; the caller toggles
/// membership from user interaction. Node keys are the deterministic
/// path-derived strings the walker emits on lines that have descendants.
#[derive(Clone, Debug, Default)]
pub struct Session {
    selected: Option<QuestId>,
    expanded: HashSet<String>,
    /// When false, totals cover only the selected quest's direct
    /// requirements; when true, the full recursive aggregation.
    pub show_full_totals: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: QuestId) {
        self.selected = Some(id);
    }

    pub fn selected(&self) -> Option<QuestId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Flip a tree node between expanded and collapsed.
    pub fn toggle_node(&mut self, key: &str) {
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// The expand-state set the tree walker reads.
    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn toggle_totals(&mut self) {
        self.show_full_totals = !self.show_full_totals;
    }

    /// Drop all state referencing a quest that is being deleted. Tree node
    /// keys are positional within the selected quest's tree, so deleting
    /// the selected quest invalidates them wholesale.
    pub fn forget_quest(&mut self, id: QuestId) {
        if self.selected == Some(id) {
            self.selected = None;
            self.expanded.clear();
        }
    }
}
