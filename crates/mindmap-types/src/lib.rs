//! Shared Content-Tree Types for the Mind-Map Explorer
//!
//! This crate is the SINGLE SOURCE OF TRUTH for the static content hierarchy
//! handed to the graph engine.
//!
//! ## Shape
//!
//! ```text
//! root (category = root)
//!  ├── main ── sub ── detail
//!  └── main ── sub
//! ```
//!
//! ## Rules
//!
//! 1. Field names match the content files (`id`, `name`, `category`, ...)
//! 2. Categories serialize lowercase
//! 3. Children are owned, never shared - the data is a tree, not a DAG

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ============================================================================
// NODE ID
// ============================================================================

/// Stable identifier of a content node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// CATEGORY
// ============================================================================

/// Position of a node in the content hierarchy (drives size and styling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Root,
    Main,
    Sub,
    #[default]
    Detail,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Root => "root",
            Category::Main => "main",
            Category::Sub => "sub",
            Category::Detail => "detail",
        }
    }

    /// Display name for detail panels
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Root => "Core topic",
            Category::Main => "Main module",
            Category::Sub => "Specific content",
            Category::Detail => "Details",
        }
    }

    /// Fallback glyph when a node carries no icon of its own
    pub fn default_icon(&self) -> &'static str {
        match self {
            Category::Root => "◎",
            Category::Main => "▤",
            Category::Sub => "▪",
            Category::Detail => "•",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Root,
            Category::Main,
            Category::Sub,
            Category::Detail,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TREE NODE
// ============================================================================

/// A node of the static content tree, as supplied by the content collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub category: Category,
    /// Hex color, e.g. `#41b3ff`
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        category: Category,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            color: color.into(),
            icon: None,
            description: None,
            details: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set icon glyph
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: append a detail line
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Glyph to draw for this node
    pub fn icon_or_default(&self) -> &str {
        self.icon
            .as_deref()
            .unwrap_or_else(|| self.category.default_icon())
    }
}
