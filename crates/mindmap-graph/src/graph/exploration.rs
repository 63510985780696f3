//! Exploration state: which nodes are expanded, visited and selected.
//!
//! The sets are owned here and only change through the operations below.
//! Hosts read them through borrowed views.

use super::tree::{ContentNode, ContentTree};
use mindmap_input::{ActionKind, GestureAction};
use mindmap_types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// EXPANDED SET
// =============================================================================

/// Ids whose children are included in the projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSet {
    ids: HashSet<NodeId>,
}

impl ExpandedSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }

    pub(crate) fn insert(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }
}

impl<T: Into<NodeId>> FromIterator<T> for ExpandedSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// What is expanded when a session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosurePolicy {
    /// Nothing expanded: only the root is visible.
    #[default]
    Collapsed,
    /// The root starts expanded.
    RootExpanded,
}

/// Snapshot for a progress indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub visited: usize,
    pub total: usize,
    /// Node whose detail is open, if any
    pub viewing: Option<NodeId>,
}

impl ProgressReport {
    pub fn complete(&self) -> bool {
        self.total > 0 && self.visited >= self.total
    }

    /// Completion in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.visited as f32 / self.total as f32
        }
    }
}

// =============================================================================
// EXPLORATION STATE
// =============================================================================

#[derive(Debug, Clone)]
pub struct ExplorationState {
    tree: Arc<ContentTree>,
    expanded: ExpandedSet,
    visited: HashSet<NodeId>,
    selected: Option<NodeId>,
    total: usize,
}

impl ExplorationState {
    pub fn new(tree: Arc<ContentTree>, policy: DisclosurePolicy) -> Self {
        let mut expanded = ExpandedSet::default();
        if policy == DisclosurePolicy::RootExpanded && tree.root().has_children() {
            expanded.insert(tree.root().id.clone());
        }
        let total = tree.len();
        Self {
            tree,
            expanded,
            visited: HashSet::new(),
            selected: None,
            total,
        }
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    /// Flip expansion of `id`. Returns whether the expanded set changed.
    ///
    /// Leaves and unknown ids are left alone.
    pub fn toggle_expand(&mut self, id: &str) -> bool {
        let Some(node) = self.tree.get(id) else {
            debug!(node = id, "toggle_expand ignored: unknown node");
            return false;
        };
        if !node.has_children() {
            debug!(node = id, "toggle_expand ignored: no children");
            return false;
        }
        if !self.expanded.remove(id) {
            self.expanded.insert(node.id.clone());
            debug!(node = id, "expanded");
        } else {
            debug!(node = id, "collapsed");
        }
        true
    }

    /// Select `id` and mark it visited. Returns whether anything changed.
    pub fn activate(&mut self, id: &str) -> bool {
        let Some(node) = self.tree.get(id) else {
            debug!(node = id, "activate ignored: unknown node");
            return false;
        };
        let newly_visited = self.visited.insert(node.id.clone());
        let reselected = self.selected.as_ref().map(NodeId::as_str) != Some(id);
        self.selected = Some(node.id.clone());
        debug!(node = id, newly_visited, "activated");
        newly_visited || reselected
    }

    /// Clear the selection. Visited and expanded are untouched.
    pub fn close_detail(&mut self) {
        if let Some(id) = self.selected.take() {
            debug!(node = %id, "detail closed");
        }
    }

    /// Route a recognized gesture to the matching operation.
    pub fn apply(&mut self, action: &GestureAction) -> bool {
        match action.kind {
            ActionKind::Activate => self.activate(action.node.as_str()),
            ActionKind::ToggleExpand => self.toggle_expand(action.node.as_str()),
        }
    }

    /// (visited, total). Total counts every node, root included.
    pub fn progress(&self) -> (usize, usize) {
        (self.visited.len(), self.total)
    }

    pub fn progress_report(&self) -> ProgressReport {
        ProgressReport {
            visited: self.visited.len(),
            total: self.total,
            viewing: self.selected.clone(),
        }
    }

    pub fn expanded(&self) -> &ExpandedSet {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.contains(id)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Content of the selected node, for a detail overlay.
    pub fn selected_node(&self) -> Option<&ContentNode> {
        self.selected.as_ref().and_then(|id| self.tree.get(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_types::{Category, TreeNode};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn tree() -> Arc<ContentTree> {
        let n = |id: &str, c| TreeNode::new(id, id, c, "#fff");
        Arc::new(
            ContentTree::new(
                n("root", Category::Root)
                    .with_child(
                        n("a", Category::Main)
                            .with_child(n("a1", Category::Sub))
                            .with_child(n("a2", Category::Sub)),
                    )
                    .with_child(n("b", Category::Main)),
            )
            .unwrap(),
        )
    }

    #[test]
    fn initial_policy() {
        let collapsed = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
        assert!(collapsed.expanded().is_empty());

        let open = ExplorationState::new(tree(), DisclosurePolicy::RootExpanded);
        assert!(open.is_expanded("root"));
    }

    #[test]
    fn toggle_leaf_or_unknown_is_noop() {
        let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
        assert!(!state.toggle_expand("b"));
        assert!(!state.toggle_expand("nope"));
        assert!(state.expanded().is_empty());
    }

    #[test]
    fn activate_marks_visited_and_selects() {
        let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
        state.activate("b");
        state.activate("b");
        state.activate("a");
        assert_eq!(state.selected().map(NodeId::as_str), Some("a"));
        assert!(state.is_visited("a") && state.is_visited("b"));
        assert_eq!(state.progress(), (2, 5));
        assert_eq!(state.selected_node().unwrap().name, "a");
    }

    #[test]
    fn close_detail_keeps_visited() {
        let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
        state.toggle_expand("root");
        state.activate("a");
        state.close_detail();
        assert!(state.selected().is_none());
        assert!(state.is_visited("a"));
        assert!(state.is_expanded("root"));
        assert_eq!(state.progress_report().viewing, None);
    }

    #[test]
    fn unknown_activate_is_ignored() {
        let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
        assert!(!state.activate("ghost"));
        assert_eq!(state.progress(), (0, 5));
        assert!(state.selected().is_none());
    }

    #[test]
    fn report_completes_when_all_visited() {
        let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
        for id in ["root", "a", "a1", "a2"] {
            state.activate(id);
        }
        assert!(!state.progress_report().complete());
        state.activate("b");
        let report = state.progress_report();
        assert!(report.complete());
        assert_eq!(report.fraction(), 1.0);
    }

    #[test]
    fn apply_routes_gestures() {
        let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
        assert!(state.apply(&GestureAction::toggle_expand("root")));
        assert!(state.apply(&GestureAction::activate("b")));
        assert!(state.is_expanded("root"));
        assert_eq!(state.selected().map(NodeId::as_str), Some("b"));
    }

    fn op() -> impl Strategy<Value = (bool, &'static str)> {
        (
            any::<bool>(),
            prop::sample::select(vec!["root", "a", "a1", "a2", "b", "ghost"]),
        )
    }

    proptest! {
        #[test]
        fn toggle_twice_is_identity(ops in prop::collection::vec(op(), 0..20), target in op()) {
            let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
            for (is_toggle, id) in ops {
                if is_toggle { state.toggle_expand(id); } else { state.activate(id); }
            }
            let before = state.expanded().clone();
            state.toggle_expand(target.1);
            state.toggle_expand(target.1);
            prop_assert_eq!(state.expanded(), &before);
        }

        #[test]
        fn visited_never_shrinks(ops in prop::collection::vec(op(), 0..30)) {
            let mut state = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
            let mut last = 0;
            for (is_toggle, id) in ops {
                match (is_toggle, id.len() % 3) {
                    (true, _) => { state.toggle_expand(id); }
                    (false, 0) => state.close_detail(),
                    (false, _) => { state.activate(id); }
                }
                let (visited, _) = state.progress();
                prop_assert!(visited >= last);
                last = visited;
            }
        }

        #[test]
        fn activate_is_idempotent(id in prop::sample::select(vec!["root", "a", "a1", "b"])) {
            let mut once = ExplorationState::new(tree(), DisclosurePolicy::Collapsed);
            once.activate(id);
            let mut twice = once.clone();
            twice.activate(id);
            prop_assert_eq!(once.progress(), twice.progress());
            prop_assert_eq!(once.selected(), twice.selected());
        }
    }
}
