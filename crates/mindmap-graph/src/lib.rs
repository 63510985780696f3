//! Mind-Map Graph Widget
//!
//! This crate contains ONLY the graph widget - no app shell, no detail overlay.
//! A host (see `mindmap-ui`) owns the window and presents the selected node.

pub mod config;
pub mod error;
pub mod graph;

pub use config::{global_config, GraphSettings};
pub use error::{ConfigError, MindMapError, ProjectionError, TreeError};

// Tree + projection
pub use graph::{project, ContentNode, ContentTree, VisibleEdge, VisibleGraph, VisibleNode};

// Exploration state
pub use graph::{DisclosurePolicy, ExpandedSet, ExplorationState, ProgressReport};

// Layout
pub use graph::{ForceConfig, ForceSimulation, SimState};

// Animation + camera
pub use graph::{Camera2D, SpringConfig, SpringF32};

// Surface
pub use graph::{MindMapSurface, PointerOutcome};
