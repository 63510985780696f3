//! Algebraic properties of projection and exploration over generated trees.

use mindmap_graph::{project, ContentTree, DisclosurePolicy, ExpandedSet, ExplorationState};
use mindmap_types::{Category, TreeNode};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Build a tree from a parent vector: node i+1 hangs under `parents[i] % (i+1)`.
fn tree_from_parents(parents: &[usize]) -> ContentTree {
    let count = parents.len() + 1;
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (i, &p) in parents.iter().enumerate() {
        children[p % (i + 1)].push(i + 1);
    }

    fn build(i: usize, children: &[Vec<usize>]) -> TreeNode {
        let category = match i {
            0 => Category::Root,
            _ if children[i].is_empty() => Category::Detail,
            _ => Category::Sub,
        };
        let mut node = TreeNode::new(format!("n{i}"), format!("Node {i}"), category, "#abcdef");
        for &c in &children[i] {
            node = node.with_child(build(c, children));
        }
        node
    }

    ContentTree::new(build(0, &children)).unwrap()
}

fn scenario() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(0usize..64, 0..24).prop_flat_map(|parents| {
        let n = parents.len() + 1;
        (Just(parents), prop::collection::vec(0..n, 0..n))
    })
}

proptest! {
    #[test]
    fn projection_has_unique_ids_and_honours_expansion((parents, open) in scenario()) {
        let tree = tree_from_parents(&parents);
        let expanded: ExpandedSet = open.iter().map(|i| format!("n{i}")).collect();
        let graph = project(&tree, &expanded).unwrap();

        let mut seen = HashSet::new();
        for id in graph.ids() {
            prop_assert!(seen.insert(id.clone()), "duplicate {}", id);
        }
        prop_assert_eq!(graph.nodes[0].id.as_str(), "n0");

        for node in tree.iter() {
            let visible = graph.contains(node.id.as_str());
            for child in tree.children(node.id.as_str()) {
                let child_visible = graph.contains(child.id.as_str());
                prop_assert_eq!(child_visible, visible && expanded.contains(node.id.as_str()));
            }
        }

        prop_assert_eq!(graph.edges.len(), graph.len() - 1);
        for edge in &graph.edges {
            prop_assert!(expanded.contains(edge.source.as_str()));
            prop_assert_eq!(&tree.parent(edge.target.as_str()).unwrap().id, &edge.source);
        }
    }

    #[test]
    fn projection_is_deterministic((parents, open) in scenario()) {
        let tree = tree_from_parents(&parents);
        let expanded: ExpandedSet = open.iter().map(|i| format!("n{i}")).collect();
        prop_assert_eq!(project(&tree, &expanded).unwrap(), project(&tree, &expanded).unwrap());
    }

    #[test]
    fn toggle_is_an_involution((parents, open) in scenario(), pick in 0usize..32) {
        let tree = Arc::new(tree_from_parents(&parents));
        let mut state = ExplorationState::new(tree.clone(), DisclosurePolicy::Collapsed);
        for i in &open {
            state.toggle_expand(&format!("n{i}"));
        }
        let target = format!("n{}", pick % tree.len());
        let before = state.expanded().clone();
        state.toggle_expand(&target);
        state.toggle_expand(&target);
        prop_assert_eq!(state.expanded(), &before);
    }
}
