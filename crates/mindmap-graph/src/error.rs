//! Error types for tree construction, projection and settings.
//!
//! None of these are fatal to the host: callers log them and keep the last
//! good state.

use mindmap_types::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Content tree failed validation at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The top-level node is not a root.
    #[error("Top-level node {0} must have category root")]
    RootCategory(NodeId),

    /// A node below the top carries the root category.
    #[error("Node {0} has category root but is not the top-level node")]
    NestedRoot(NodeId),

    /// Two nodes share an id.
    #[error("Duplicate node id {0}")]
    DuplicateId(NodeId),

    /// A node has an empty id.
    #[error("Node with empty id under parent {parent}")]
    EmptyId { parent: NodeId },

    /// Nesting exceeds the supported depth.
    #[error("Tree depth exceeds {max} at node {at}")]
    TooDeep { at: NodeId, max: usize },
}

/// Projection ran into a structure that is not a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The same id was reached twice (shared child or cycle).
    #[error("Node {0} reached twice during projection: content is not a tree")]
    RepeatedId(NodeId),

    /// Traversal went deeper than the defensive bound.
    #[error("Projection depth exceeded {max}")]
    DepthExceeded { max: usize },
}

/// Settings file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid gesture timing: {0}")]
    Gesture(#[from] mindmap_input::GestureError),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Anything that can go wrong while building a surface.
#[derive(Debug, Error)]
pub enum MindMapError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ProjectionError {
    /// Indicates corrupted content rather than a transient condition.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, ProjectionError::RepeatedId(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TreeError::DuplicateId(NodeId::from("works"));
        assert!(err.to_string().contains("works"));

        let err = ProjectionError::DepthExceeded { max: 64 };
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn repeated_id_is_configuration_error() {
        assert!(ProjectionError::RepeatedId(NodeId::from("a")).is_configuration_error());
        assert!(!ProjectionError::DepthExceeded { max: 1 }.is_configuration_error());
    }

    #[test]
    fn surface_error_wraps_tree_error() {
        let err: MindMapError = TreeError::NestedRoot(NodeId::from("x")).into();
        assert!(matches!(err, MindMapError::Tree(_)));
    }
}
