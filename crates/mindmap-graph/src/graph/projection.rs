//! Visibility projection: (content tree, expanded set) -> visible graph.
//!
//! The root is always visible. A node's children are visible iff the node is
//! visible and expanded. Expanded ids under a collapsed ancestor stay in the
//! set but contribute nothing.

use super::exploration::ExpandedSet;
use super::tree::{ContentNode, ContentTree, MAX_TREE_DEPTH};
use crate::error::ProjectionError;
use mindmap_types::{Category, NodeId};
use std::collections::{HashMap, HashSet};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleNode {
    pub id: NodeId,
    pub name: String,
    pub category: Category,
    pub color: String,
    pub icon: String,
    pub depth: usize,
    /// Whether the content node has children, expanded or not
    pub has_children: bool,
}

impl VisibleNode {
    fn from_content(node: &ContentNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            category: node.category,
            color: node.color.clone(),
            icon: node.icon_or_default().to_string(),
            depth: node.depth,
            has_children: node.has_children(),
        }
    }
}

/// Parent -> child link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisibleEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Visible subset, nodes in pre-order with the root first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleGraph {
    pub nodes: Vec<VisibleNode>,
    pub edges: Vec<VisibleEdge>,
    index: HashMap<NodeId, usize>,
}

impl VisibleGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&VisibleNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.id)
    }

    /// Visible nodes linked to `id` in either direction.
    pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.edges.iter().filter_map(move |e| {
            if e.source.as_str() == id {
                Some(&e.target)
            } else if e.target.as_str() == id {
                Some(&e.source)
            } else {
                None
            }
        })
    }
}

/// Compute the visible graph for the given expanded set.
///
/// Pure: same inputs give the same output. Errors only if the content reaches
/// an id twice or nests past the depth bound.
#[instrument(level = "debug", skip_all, fields(expanded = expanded.len()))]
pub fn project(tree: &ContentTree, expanded: &ExpandedSet) -> Result<VisibleGraph, ProjectionError> {
    let mut graph = VisibleGraph::default();
    let mut seen: HashSet<&str> = HashSet::new();

    let root = tree.root();
    let mut stack: Vec<&ContentNode> = vec![root];

    while let Some(node) = stack.pop() {
        if node.depth > MAX_TREE_DEPTH {
            return Err(ProjectionError::DepthExceeded {
                max: MAX_TREE_DEPTH,
            });
        }
        if !seen.insert(node.id.as_str()) {
            return Err(ProjectionError::RepeatedId(node.id.clone()));
        }

        graph.index.insert(node.id.clone(), graph.nodes.len());
        graph.nodes.push(VisibleNode::from_content(node));

        if node.has_children() && expanded.contains(node.id.as_str()) {
            let children: Vec<&ContentNode> = tree.children(node.id.as_str()).collect();
            for child in &children {
                graph.edges.push(VisibleEdge {
                    source: node.id.clone(),
                    target: child.id.clone(),
                });
            }
            stack.extend(children.into_iter().rev());
        }
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "projected visible graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_types::TreeNode;
    use pretty_assertions::assert_eq;

    fn node(id: &str, category: Category) -> TreeNode {
        TreeNode::new(id, id, category, "#fff")
    }

    fn tree() -> ContentTree {
        ContentTree::new(
            node("root", Category::Root)
                .with_child(
                    node("a", Category::Main)
                        .with_child(node("a1", Category::Sub))
                        .with_child(node("a2", Category::Sub)),
                )
                .with_child(node("b", Category::Main)),
        )
        .unwrap()
    }

    fn ids(graph: &VisibleGraph) -> Vec<&str> {
        graph.ids().map(NodeId::as_str).collect()
    }

    #[test]
    fn empty_set_shows_only_root() {
        let graph = project(&tree(), &ExpandedSet::default()).unwrap();
        assert_eq!(ids(&graph), vec!["root"]);
        assert!(graph.edges.is_empty());
        assert!(graph.nodes[0].has_children);
    }

    #[test]
    fn expanded_root_shows_children() {
        let expanded: ExpandedSet = ["root"].into_iter().collect();
        let graph = project(&tree(), &expanded).unwrap();
        assert_eq!(ids(&graph), vec!["root", "a", "b"]);
        assert_eq!(graph.edges.len(), 2);
        assert!(graph.node("a").unwrap().has_children);
        assert!(!graph.node("b").unwrap().has_children);
    }

    #[test]
    fn expanded_under_collapsed_ancestor_contributes_nothing() {
        let expanded: ExpandedSet = ["a"].into_iter().collect();
        let graph = project(&tree(), &expanded).unwrap();
        assert_eq!(ids(&graph), vec!["root"]);
    }

    #[test]
    fn leaf_in_set_adds_no_edges() {
        let expanded: ExpandedSet = ["root", "b"].into_iter().collect();
        let graph = project(&tree(), &expanded).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn every_edge_is_a_parent_child_pair() {
        let expanded: ExpandedSet = ["root", "a"].into_iter().collect();
        let t = tree();
        let graph = project(&t, &expanded).unwrap();
        assert_eq!(graph.edges.len(), graph.len() - 1);
        for edge in &graph.edges {
            assert!(graph.contains(edge.source.as_str()));
            assert!(graph.contains(edge.target.as_str()));
            assert_eq!(t.parent(edge.target.as_str()).unwrap().id, edge.source);
        }
        let around_a: Vec<&str> = graph.neighbors("a").map(NodeId::as_str).collect();
        assert_eq!(around_a, vec!["root", "a1", "a2"]);
    }
}
