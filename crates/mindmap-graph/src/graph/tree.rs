//! Validated, immutable content tree.
//!
//! Nodes live in an arena indexed by position; the id map gives O(1) lookup.
//! Built once from a [`TreeNode`] and shared read-only afterwards.

use crate::error::TreeError;
use mindmap_types::{Category, NodeId, TreeNode};
use std::collections::HashMap;

/// Nesting beyond this is rejected at construction.
pub const MAX_TREE_DEPTH: usize = 64;

/// One node of the content tree, without its nested children.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    pub id: NodeId,
    pub name: String,
    pub category: Category,
    pub color: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub details: Vec<String>,
    /// Depth from the root (root = 0)
    pub depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl ContentNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn icon_or_default(&self) -> &str {
        self.icon
            .as_deref()
            .unwrap_or_else(|| self.category.default_icon())
    }
}

#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<ContentNode>,
    index: HashMap<NodeId, usize>,
}

impl ContentTree {
    /// Validate and flatten a nested tree.
    ///
    /// Rejects: non-root top node, nested roots, empty or duplicate ids, and
    /// nesting deeper than [`MAX_TREE_DEPTH`].
    pub fn new(root: TreeNode) -> Result<Self, TreeError> {
        if root.category != Category::Root {
            return Err(TreeError::RootCategory(root.id));
        }

        let mut nodes: Vec<ContentNode> = Vec::new();
        let mut index: HashMap<NodeId, usize> = HashMap::new();

        // (node, parent arena index, depth); children pushed in reverse keeps pre-order
        let mut stack: Vec<(TreeNode, Option<usize>, usize)> = vec![(root, None, 0)];

        while let Some((node, parent, depth)) = stack.pop() {
            let TreeNode {
                id,
                name,
                category,
                color,
                icon,
                description,
                details,
                children,
            } = node;

            if id.as_str().is_empty() {
                let parent = parent
                    .map(|p| nodes[p].id.clone())
                    .unwrap_or_else(|| NodeId::new(""));
                return Err(TreeError::EmptyId { parent });
            }
            if depth > MAX_TREE_DEPTH {
                return Err(TreeError::TooDeep {
                    at: id,
                    max: MAX_TREE_DEPTH,
                });
            }
            if parent.is_some() && category == Category::Root {
                return Err(TreeError::NestedRoot(id));
            }
            if index.contains_key(&id) {
                return Err(TreeError::DuplicateId(id));
            }

            let slot = nodes.len();
            index.insert(id.clone(), slot);
            nodes.push(ContentNode {
                id,
                name,
                category,
                color,
                icon,
                description,
                details,
                depth,
                parent,
                children: Vec::with_capacity(children.len()),
            });
            if let Some(p) = parent {
                nodes[p].children.push(slot);
            }

            for child in children.into_iter().rev() {
                stack.push((child, Some(slot), depth + 1));
            }
        }

        tracing::debug!(nodes = nodes.len(), "content tree built");
        Ok(Self { nodes, index })
    }

    pub fn root(&self) -> &ContentNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.get(id).is_some_and(ContentNode::has_children)
    }

    /// Children of `id` in content order. Empty for unknown ids.
    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a ContentNode> + 'a {
        let kids: &[usize] = self
            .index
            .get(id)
            .map(|&i| self.nodes[i].children.as_slice())
            .unwrap_or(&[]);
        kids.iter().map(move |&c| &self.nodes[c])
    }

    pub fn parent(&self, id: &str) -> Option<&ContentNode> {
        let &i = self.index.get(id)?;
        self.nodes[i].parent.map(|p| &self.nodes[p])
    }

    /// Total node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: construction requires a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str, category: Category) -> TreeNode {
        TreeNode::new(id, id.to_uppercase(), category, "#41b3ff")
    }

    fn sample() -> TreeNode {
        node("root", Category::Root)
            .with_child(
                node("a", Category::Main)
                    .with_child(node("a1", Category::Sub))
                    .with_child(node("a2", Category::Sub)),
            )
            .with_child(node("b", Category::Main))
    }

    #[test]
    fn flattens_in_pre_order() {
        let tree = ContentTree::new(sample()).unwrap();
        let ids: Vec<&str> = tree.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "a2", "b"]);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.get("a2").unwrap().depth, 2);
    }

    #[test]
    fn children_and_parent() {
        let tree = ContentTree::new(sample()).unwrap();
        let kids: Vec<&str> = tree.children("a").map(|n| n.id.as_str()).collect();
        assert_eq!(kids, vec!["a1", "a2"]);
        assert_eq!(tree.parent("a1").unwrap().id.as_str(), "a");
        assert!(tree.parent("root").is_none());
        assert_eq!(tree.children("missing").count(), 0);
        assert!(tree.has_children("root"));
        assert!(!tree.has_children("b"));
    }

    #[test]
    fn rejects_non_root_top() {
        let err = ContentTree::new(node("x", Category::Main)).unwrap_err();
        assert_eq!(err, TreeError::RootCategory(NodeId::from("x")));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let tree = node("root", Category::Root)
            .with_child(node("a", Category::Main))
            .with_child(node("a", Category::Main));
        assert_eq!(
            ContentTree::new(tree).unwrap_err(),
            TreeError::DuplicateId(NodeId::from("a"))
        );
    }

    #[test]
    fn rejects_nested_root() {
        let tree = node("root", Category::Root).with_child(node("r2", Category::Root));
        assert_eq!(
            ContentTree::new(tree).unwrap_err(),
            TreeError::NestedRoot(NodeId::from("r2"))
        );
    }

    #[test]
    fn rejects_empty_id() {
        let tree = node("root", Category::Root).with_child(node("", Category::Main));
        assert!(matches!(
            ContentTree::new(tree).unwrap_err(),
            TreeError::EmptyId { .. }
        ));
    }

    #[test]
    fn rejects_excessive_depth() {
        let mut chain = node("leaf", Category::Detail);
        for i in (0..=MAX_TREE_DEPTH).rev() {
            chain = node(&format!("n{i}"), Category::Sub).with_child(chain);
        }
        let tree = node("root", Category::Root).with_child(chain);
        assert!(matches!(
            ContentTree::new(tree).unwrap_err(),
            TreeError::TooDeep { .. }
        ));
    }

    #[test]
    fn icon_falls_back_to_category() {
        let tree = ContentTree::new(sample()).unwrap();
        let root = tree.root();
        assert_eq!(root.icon_or_default(), Category::Root.default_icon());
    }
}
