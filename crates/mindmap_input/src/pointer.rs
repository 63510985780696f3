//! Node-targeted pointer events from any source.

use mindmap_types::NodeId;
use serde::{Deserialize, Serialize};

/// Input modality an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Mouse,
    Touch,
}

/// Pointer event aimed at a node.
///
/// Platform events are converted to this type by the surface after hit
/// testing; events over empty background never reach the disambiguator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    // =========================================================================
    // MOUSE
    // =========================================================================
    /// Primary button pressed on a node.
    MouseDown { target: NodeId },

    // =========================================================================
    // TOUCH
    // =========================================================================
    /// Finger down on a node.
    TouchStart { target: NodeId },

    /// Finger up on a node.
    TouchEnd { target: NodeId },

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// Gesture abandoned (drag began, touch cancelled by the platform).
    Cancel,
}

impl PointerEvent {
    /// Create a mouse press event.
    pub fn mouse_down(target: impl Into<NodeId>) -> Self {
        PointerEvent::MouseDown {
            target: target.into(),
        }
    }

    /// Create a touch start event.
    pub fn touch_start(target: impl Into<NodeId>) -> Self {
        PointerEvent::TouchStart {
            target: target.into(),
        }
    }

    /// Create a touch end event.
    pub fn touch_end(target: impl Into<NodeId>) -> Self {
        PointerEvent::TouchEnd {
            target: target.into(),
        }
    }

    /// Node this event is aimed at, if any.
    pub fn target(&self) -> Option<&NodeId> {
        match self {
            PointerEvent::MouseDown { target }
            | PointerEvent::TouchStart { target }
            | PointerEvent::TouchEnd { target } => Some(target),
            PointerEvent::Cancel => None,
        }
    }

    /// Modality of this event (`None` for modality-free events).
    pub fn modality(&self) -> Option<Modality> {
        match self {
            PointerEvent::MouseDown { .. } => Some(Modality::Mouse),
            PointerEvent::TouchStart { .. } | PointerEvent::TouchEnd { .. } => {
                Some(Modality::Touch)
            }
            PointerEvent::Cancel => None,
        }
    }

    /// Check if this is a touch event.
    pub fn is_touch(&self) -> bool {
        self.modality() == Some(Modality::Touch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_classification() {
        assert!(PointerEvent::touch_start("a").is_touch());
        assert!(!PointerEvent::mouse_down("a").is_touch());
        assert_eq!(PointerEvent::Cancel.modality(), None);
    }

    #[test]
    fn event_target() {
        let event = PointerEvent::touch_end("leaf");
        assert_eq!(event.target().map(NodeId::as_str), Some("leaf"));
        assert!(PointerEvent::Cancel.target().is_none());
    }
}
