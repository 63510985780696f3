//! Mind-Map Exploration Module
//!
//! Progressive disclosure over a static content tree: only expanded branches
//! are visible, the visible subset is laid out by a force simulation, and
//! pointer gestures drive expansion and detail selection.
//!
//! # Architecture
//!
//! ```text
//! TreeNode (content, validated once)
//!        │
//!        ▼
//! ContentTree ──► project(tree, expanded) ──► VisibleGraph
//!        ▲                                         │
//!        │                                         ▼
//! ExplorationState ◄── GestureAction       ForceSimulation (step per frame)
//!   expanded / visited / selected                  │
//!        ▲                                         ├──► GraphRenderer (egui::Painter)
//!        │                                         │
//!        └──────────── MindMapSurface ◄────────────┘
//!                       (Disambiguator, Camera2D, springs)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut surface = MindMapSurface::new(tree, global_config().clone())?;
//! // Each frame:
//! surface.ui(ui);
//! if let Some(node) = surface.state().selected_node() {
//!     show_detail(node);
//! }
//! ```

pub mod animation;
pub mod camera;
pub mod colors;
pub mod exploration;
pub mod force_sim;
pub mod projection;
pub mod render;
pub mod surface;
pub mod tree;

pub use animation::{SpringConfig, SpringF32, SpringVec2};
pub use camera::Camera2D;
pub use exploration::{DisclosurePolicy, ExpandedSet, ExplorationState, ProgressReport};
pub use force_sim::{step, ForceConfig, ForceSimulation, SimNode, SimState};
pub use projection::{project, VisibleEdge, VisibleGraph, VisibleNode};
pub use render::{GraphRenderer, RenderContext};
pub use surface::{MindMapSurface, PointerOutcome};
pub use tree::{ContentNode, ContentTree, MAX_TREE_DEPTH};
