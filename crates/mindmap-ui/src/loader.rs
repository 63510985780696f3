//! Content tree loading (JSON or YAML by extension, or the bundled sample)

use anyhow::{bail, Context, Result};
use mindmap_types::TreeNode;
use std::path::Path;
use tracing::info;

/// Sample content shipped with the viewer
pub const SAMPLE_TREE: &str = include_str!("../assets/sample_tree.yaml");

/// On-disk format of a content file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl TreeFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(TreeFormat::Json),
            "yaml" | "yml" => Some(TreeFormat::Yaml),
            _ => None,
        }
    }
}

pub fn parse_tree(text: &str, format: TreeFormat) -> Result<TreeNode> {
    let root = match format {
        TreeFormat::Json => serde_json::from_str(text).context("invalid JSON content tree")?,
        TreeFormat::Yaml => serde_yaml::from_str(text).context("invalid YAML content tree")?,
    };
    Ok(root)
}

/// Read a content tree from `path`.
pub fn load_tree(path: &Path) -> Result<TreeNode> {
    let Some(format) = TreeFormat::from_path(path) else {
        bail!(
            "unsupported content file {} (expected .json, .yaml or .yml)",
            path.display()
        );
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let root = parse_tree(&text, format).with_context(|| format!("in {}", path.display()))?;
    info!(path = %path.display(), root = %root.id, "content tree loaded");
    Ok(root)
}

pub fn sample_tree() -> Result<TreeNode> {
    parse_tree(SAMPLE_TREE, TreeFormat::Yaml).context("bundled sample tree")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_graph::ContentTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            TreeFormat::from_path(Path::new("tree.JSON")),
            Some(TreeFormat::Json)
        );
        assert_eq!(
            TreeFormat::from_path(Path::new("a/b/tree.yml")),
            Some(TreeFormat::Yaml)
        );
        assert_eq!(TreeFormat::from_path(Path::new("tree.toml")), None);
        assert_eq!(TreeFormat::from_path(Path::new("tree")), None);
    }

    #[test]
    fn sample_tree_is_valid_content() {
        let root = sample_tree().unwrap();
        assert_eq!(root.id.as_str(), "root");
        let tree = ContentTree::new(root).unwrap();
        assert_eq!(tree.len(), 12);
        assert!(tree.has_children("gains"));
    }

    #[test]
    fn parses_json() {
        let root = parse_tree(
            r##"{"id":"r","name":"R","category":"root","color":"#000000"}"##,
            TreeFormat::Json,
        )
        .unwrap();
        assert_eq!(root.name, "R");
    }

    #[test]
    fn rejects_unknown_extension_and_missing_file() {
        assert!(load_tree(Path::new("content.txt")).is_err());
        assert!(load_tree(Path::new("/definitely/not/here.yaml")).is_err());
    }
}
