//! Gesture disambiguation for node clicks and taps.
//!
//! Transition table (one pending timer per surface):
//!
//! ```text
//! state           event                 -> state          emits
//! Idle            MouseDown(n)          -> PendingSingle  -
//! PendingSingle n MouseDown(n)          -> Idle           ToggleExpand(n)
//! PendingSingle n timer elapsed         -> Idle           Activate(n)
//! Idle            TouchStart(n)         -> Pressed        -
//! Pressed n       TouchEnd(n)           -> Idle           Activate(n)
//! Pressed n       timer elapsed         -> Idle           ToggleExpand(n)
//! any pending     event on other node   -> replaced / Idle -
//! any pending     Cancel                -> Idle           -
//! ```

use crate::config::GestureConfig;
use crate::pointer::PointerEvent;
use mindmap_types::NodeId;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Semantic action recognized from a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Open the node's detail.
    Activate,
    /// Expand or collapse the node's children.
    ToggleExpand,
}

/// Action bound to the node it was recognized on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureAction {
    pub kind: ActionKind,
    pub node: NodeId,
}

impl GestureAction {
    pub fn activate(node: impl Into<NodeId>) -> Self {
        Self {
            kind: ActionKind::Activate,
            node: node.into(),
        }
    }

    pub fn toggle_expand(node: impl Into<NodeId>) -> Self {
        Self {
            kind: ActionKind::ToggleExpand,
            node: node.into(),
        }
    }
}

/// Whether the host should let an event reach background handlers (pan/zoom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

/// Result of feeding one event to the disambiguator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Actions in emission order. A timer that had already expired when the
    /// event arrived fires first.
    pub actions: Vec<GestureAction>,
    pub propagation: Propagation,
}

impl Dispatch {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn stops_propagation(&self) -> bool {
        self.propagation == Propagation::Stop
    }
}

/// State of gesture recognition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No timer pending.
    #[default]
    Idle,
    /// Mouse: first click seen, waiting for a second one.
    PendingSingle { node: NodeId, deadline: u64 },
    /// Touch: finger down, waiting for release or long-press.
    Pressed { node: NodeId, deadline: u64 },
}

impl GestureState {
    fn deadline(&self) -> Option<u64> {
        match self {
            GestureState::Idle => None,
            GestureState::PendingSingle { deadline, .. } | GestureState::Pressed { deadline, .. } => {
                Some(*deadline)
            }
        }
    }

    fn node(&self) -> Option<&NodeId> {
        match self {
            GestureState::Idle => None,
            GestureState::PendingSingle { node, .. } | GestureState::Pressed { node, .. } => {
                Some(node)
            }
        }
    }
}

/// Click/tap disambiguator holding at most one pending timer.
#[derive(Debug, Default)]
pub struct Disambiguator {
    state: GestureState,
    config: GestureConfig,
}

impl Disambiguator {
    /// Create a disambiguator with default timing.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Create with custom timing.
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            state: GestureState::Idle,
            config,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Get current gesture state.
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Is a timer pending?
    pub fn is_pending(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Deadline of the pending timer, for scheduling the next wake-up.
    pub fn next_deadline(&self) -> Option<u64> {
        self.state.deadline()
    }

    /// Classify one event at time `now` (ms).
    pub fn handle(&mut self, event: PointerEvent, now: u64) -> Dispatch {
        let mut actions: Vec<GestureAction> = self.poll(now).into_iter().collect();

        let propagation = match event {
            PointerEvent::MouseDown { target } => {
                self.mouse_down(target, now, &mut actions);
                Propagation::Stop
            }
            PointerEvent::TouchStart { target } => {
                self.touch_start(target, now);
                Propagation::Stop
            }
            PointerEvent::TouchEnd { target } => {
                self.touch_end(target, &mut actions);
                Propagation::Stop
            }
            PointerEvent::Cancel => {
                self.cancel();
                Propagation::Continue
            }
        };

        Dispatch {
            actions,
            propagation,
        }
    }

    /// Fire the pending timer if it has elapsed by `now`.
    pub fn poll(&mut self, now: u64) -> Option<GestureAction> {
        let deadline = self.state.deadline()?;
        if now < deadline {
            return None;
        }

        let action = match std::mem::take(&mut self.state) {
            GestureState::PendingSingle { node, .. } => GestureAction::activate(node),
            GestureState::Pressed { node, .. } => GestureAction::toggle_expand(node),
            GestureState::Idle => return None,
        };
        debug!(node = %action.node, kind = ?action.kind, "gesture timer elapsed");
        Some(action)
    }

    /// Drop any pending timer without emitting. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            GestureState::Idle => false,
            pending => {
                trace!(node = ?pending.node(), "pending gesture cancelled");
                true
            }
        }
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    fn mouse_down(&mut self, target: NodeId, now: u64, actions: &mut Vec<GestureAction>) {
        match &self.state {
            GestureState::PendingSingle { node, .. } if *node == target => {
                self.state = GestureState::Idle;
                debug!(node = %target, "double click");
                actions.push(GestureAction::toggle_expand(target));
            }
            _ => {
                if self.is_pending() {
                    trace!(from = ?self.state.node(), to = %target, "replacing pending gesture");
                }
                self.state = GestureState::PendingSingle {
                    node: target,
                    deadline: now.saturating_add(self.config.click_delay_ms),
                };
            }
        }
    }

    fn touch_start(&mut self, target: NodeId, now: u64) {
        if self.is_pending() {
            trace!(from = ?self.state.node(), to = %target, "replacing pending gesture");
        }
        self.state = GestureState::Pressed {
            node: target,
            deadline: now.saturating_add(self.config.long_press_ms),
        };
    }

    fn touch_end(&mut self, target: NodeId, actions: &mut Vec<GestureAction>) {
        match &self.state {
            GestureState::Pressed { node, .. } if *node == target => {
                self.state = GestureState::Idle;
                debug!(node = %target, "tap");
                actions.push(GestureAction::activate(target));
            }
            GestureState::Idle => {
                // Release after a long press already fired, or a stray end.
            }
            GestureState::PendingSingle { node, .. } if *node == target => {}
            _ => {
                self.cancel();
            }
        }
    }
}
