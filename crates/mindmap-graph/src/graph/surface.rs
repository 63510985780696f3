//! Mind-map surface: ties exploration state, projection, layout, gestures
//! and camera together, and draws them into an egui `Ui`.
//!
//! Everything except [`MindMapSurface::ui`] is headless and can be driven
//! directly with timestamps from a [`ManualClock`](mindmap_input::ManualClock).
//!
//! # Frame order
//! 1. `set_viewport` if the allocated size changed
//! 2. translate egui input into `PointerEvent`s / drag / pan / zoom
//! 3. `update(now, dt)` fires expired gesture timers, ticks layout and springs
//! 4. render, then schedule the next repaint

use super::animation::{SpringConfig, SpringF32};
use super::camera::Camera2D;
use super::colors;
use super::exploration::{ExplorationState, ProgressReport};
use super::force_sim::ForceSimulation;
use super::projection::{project, VisibleGraph};
use super::render::{GraphRenderer, NodeVisual, RenderContext};
use super::tree::ContentTree;
use crate::config::GraphSettings;
use crate::error::MindMapError;
use egui::{Key, Pos2, Rect, Sense, Vec2};
use mindmap_input::{
    ActionKind, Clock, Disambiguator, GestureAction, MonotonicClock, PointerEvent, Propagation,
};
use mindmap_types::{NodeId, TreeNode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

const FIT_PADDING: f32 = 40.0;
const SCROLL_ZOOM_SPEED: f32 = 0.002;

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PointerOutcome {
    /// Actions recognized, in emission order
    pub actions: Vec<GestureAction>,
    /// Stop means background pan/zoom must ignore the event
    pub propagation: Propagation,
    /// Exploration state changed
    pub changed: bool,
}

/// Per-node animation state
#[derive(Debug, Clone)]
struct NodeAnim {
    /// Entry scale, 0 -> 1
    appear: SpringF32,
    /// Side length, grows on hover
    side: SpringF32,
}

pub struct MindMapSurface {
    settings: GraphSettings,
    state: ExplorationState,
    graph: VisibleGraph,
    sim: ForceSimulation,
    gestures: Disambiguator,
    camera: Camera2D,
    renderer: GraphRenderer,
    clock: Box<dyn Clock>,
    anims: HashMap<NodeId, NodeAnim>,
    screen_rect: Rect,
    compact: bool,
    hovered: Option<NodeId>,
    dragging: Option<NodeId>,
    /// Node a touch started on; its release is delivered there
    touch_target: Option<NodeId>,
    torn_down: bool,
}

impl std::fmt::Debug for MindMapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MindMapSurface")
            .field("visible", &self.graph.len())
            .field("viewport", &self.screen_rect.size())
            .field("compact", &self.compact)
            .field("gesture", self.gestures.state())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl MindMapSurface {
    /// Validate the tree and build the initial projection.
    pub fn new(root: TreeNode, settings: GraphSettings) -> Result<Self, MindMapError> {
        settings.validate()?;
        let tree = Arc::new(ContentTree::new(root)?);
        let state = ExplorationState::new(tree, settings.exploration.initial_disclosure);
        let graph = project(state.tree(), state.expanded())?;

        let mut sim = ForceSimulation::new(settings.layout.regular.clone());
        sim.sync(&graph);

        info!(
            nodes = state.tree().len(),
            visible = graph.len(),
            policy = ?settings.exploration.initial_disclosure,
            "mind map surface created"
        );

        let mut surface = Self {
            gestures: Disambiguator::with_config(settings.gestures),
            camera: Camera2D::new(&settings.camera, &settings.animation),
            settings,
            state,
            graph,
            sim,
            renderer: GraphRenderer::new(),
            clock: Box::new(MonotonicClock::new()),
            anims: HashMap::new(),
            screen_rect: Rect::NOTHING,
            compact: false,
            hovered: None,
            dragging: None,
            touch_target: None,
            torn_down: false,
        };
        surface.sync_anims();
        Ok(surface)
    }

    /// Replace the time source used by [`ui`](Self::ui).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn state(&self) -> &ExplorationState {
        &self.state
    }

    pub fn graph(&self) -> &VisibleGraph {
        &self.graph
    }

    pub fn simulation(&self) -> &ForceSimulation {
        &self.sim
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn gestures(&self) -> &Disambiguator {
        &self.gestures
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn progress_report(&self) -> ProgressReport {
        self.state.progress_report()
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Clear the detail selection (host overlay closed).
    pub fn close_detail(&mut self) {
        self.state.close_detail();
    }

    // =========================================================================
    // VIEWPORT
    // =========================================================================

    /// Record a new viewport size in points.
    ///
    /// Cancels any pending gesture, picks the force preset for the width,
    /// restarts the layout from current positions and recenters the camera.
    /// Ignored after [`Self::teardown`].
    pub fn set_viewport(&mut self, size: Vec2) {
        if self.torn_down {
            return;
        }
        self.screen_rect = Rect::from_min_size(self.screen_rect_origin(), size);
        if self.gestures.cancel() {
            debug!("pending gesture cancelled by viewport change");
        }
        self.touch_target = None;

        self.compact = self.settings.layout.is_compact(size.x);
        self.sim
            .set_config(self.settings.layout.preset_for_width(size.x).clone());
        self.sim.set_viewport(size);
        if !self.sim.is_ready() {
            return;
        }

        let cam = &self.settings.camera;
        let zoom = if self.compact && self.graph.len() > cam.compact_zoom_min_nodes {
            cam.compact_initial_zoom
        } else {
            1.0
        };
        self.camera.snap((size / 2.0).to_pos2(), zoom);
        debug!(?size, compact = self.compact, zoom, "viewport set");
    }

    fn screen_rect_origin(&self) -> Pos2 {
        if self.screen_rect.is_finite() {
            self.screen_rect.min
        } else {
            Pos2::ZERO
        }
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Feed one node-targeted pointer event observed at `now` (ms).
    pub fn handle_pointer(&mut self, event: PointerEvent, now: u64) -> PointerOutcome {
        if self.torn_down {
            return PointerOutcome::default();
        }
        let dispatch = self.gestures.handle(event, now);
        let changed = self.apply_actions(&dispatch.actions);
        PointerOutcome {
            actions: dispatch.actions,
            propagation: dispatch.propagation,
            changed,
        }
    }

    fn apply_actions(&mut self, actions: &[GestureAction]) -> bool {
        let mut changed = false;
        let mut reproject = false;
        for action in actions {
            let applied = self.state.apply(action);
            debug!(node = %action.node, kind = ?action.kind, applied, "gesture action");
            changed |= applied;
            reproject |= applied && action.kind == ActionKind::ToggleExpand;
        }
        if reproject {
            self.reproject();
        }
        changed
    }

    /// Recompute the visible graph. On error the previous graph is kept.
    fn reproject(&mut self) {
        match project(self.state.tree(), self.state.expanded()) {
            Ok(graph) => {
                self.graph = graph;
                self.sim.sync(&self.graph);
                self.sync_anims();
            }
            Err(e) => {
                error!("Projection failed, keeping previous graph: {}", e);
            }
        }
    }

    fn sync_anims(&mut self) {
        let appear_cfg = SpringConfig::from_settings(&self.settings.animation, "bouncy");
        let side_cfg = SpringConfig::from_settings(&self.settings.animation, "fast");
        self.anims.retain(|id, _| self.graph.contains(id.as_str()));
        for node in &self.graph.nodes {
            let side = self.settings.nodes.side(node.category, self.compact, false);
            self.anims.entry(node.id.clone()).or_insert_with(|| {
                let mut appear = SpringF32::with_config(0.0, appear_cfg);
                appear.set_target(1.0);
                NodeAnim {
                    appear,
                    side: SpringF32::with_config(side, side_cfg),
                }
            });
        }
    }

    /// Pin a node under the pointer. Any pending click/tap is abandoned.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        if self.torn_down || !self.sim.begin_drag(id) {
            return false;
        }
        if self.gestures.cancel() {
            debug!(node = id, "pending gesture abandoned for drag");
        }
        self.touch_target = None;
        self.dragging = self.graph.node(id).map(|n| n.id.clone());
        debug!(node = id, "drag started");
        true
    }

    pub fn drag_to(&mut self, id: &str, world: Pos2) {
        self.sim.drag_to(id, world);
    }

    pub fn end_drag(&mut self, id: &str) {
        self.sim.end_drag(id);
        if self.dragging.as_ref().is_some_and(|d| d.as_str() == id) {
            self.dragging = None;
            debug!(node = id, "drag ended");
        }
    }

    /// Topmost visible node at a screen position.
    pub fn hit_test(&self, screen_pos: Pos2) -> Option<NodeId> {
        if !self.sim.is_ready() {
            return None;
        }
        let world = self.camera.screen_to_world(screen_pos, self.screen_rect);
        self.sim
            .node_at_with(world, |n| {
                let side = self
                    .anims
                    .get(&n.id)
                    .map(|a| a.side.get() * a.appear.get().max(0.5))
                    .unwrap_or(n.radius * 2.0);
                side / 2.0
            })
            .map(|n| n.id.clone())
    }

    // =========================================================================
    // FRAME UPDATE
    // =========================================================================

    /// Fire expired gesture timers and advance layout and animations by `dt` seconds.
    pub fn update(&mut self, now: u64, dt: f32) {
        if self.torn_down {
            return;
        }
        if let Some(action) = self.gestures.poll(now) {
            self.apply_actions(std::slice::from_ref(&action));
        }

        self.sim.tick(dt);
        self.camera.update(dt);

        for node in &self.graph.nodes {
            let hovered = self.hovered.as_ref() == Some(&node.id);
            let side = self.settings.nodes.side(node.category, self.compact, hovered);
            if let Some(anim) = self.anims.get_mut(&node.id) {
                anim.side.set_target(side);
                anim.appear.tick(dt);
                anim.side.tick(dt);
            }
        }
    }

    /// Something is still moving or a timer is pending.
    pub fn needs_repaint(&self) -> bool {
        !self.torn_down
            && (self.sim.is_running()
                || self.camera.is_animating()
                || self
                    .anims
                    .values()
                    .any(|a| a.appear.is_animating() || a.side.is_animating()))
    }

    /// Cancel gesture timers and stop the layout. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.gestures.cancel();
        self.sim.stop();
        if let Some(id) = self.dragging.take() {
            self.sim.end_drag(id.as_str());
        }
        self.touch_target = None;
        self.torn_down = true;
        debug!("mind map surface torn down");
    }

    /// Fit the camera to the current layout.
    pub fn fit_view(&mut self) {
        if let Some(bounds) = self.sim.bounds() {
            self.camera
                .fit_to_bounds(bounds, self.screen_rect, FIT_PADDING);
        }
    }

    // =========================================================================
    // EGUI
    // =========================================================================

    /// Allocate the available space, handle input and draw.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if rect.size() != self.screen_rect.size() || (!self.sim.is_ready() && rect.area() > 0.0) {
            self.screen_rect = rect;
            self.set_viewport(rect.size());
        }
        self.screen_rect = rect;

        let now = self.clock.now_ms();
        let dt = ui.input(|i| i.stable_dt).min(0.1);

        if !self.torn_down {
            self.handle_egui_input(ui, &response);
        }
        self.update(now, dt);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, egui::Rounding::ZERO, colors::BACKGROUND);
        self.paint(&painter);

        if self.needs_repaint() {
            ui.ctx().request_repaint();
        } else if let Some(deadline) = self.gestures.next_deadline() {
            let wait = deadline.saturating_sub(now);
            ui.ctx().request_repaint_after(Duration::from_millis(wait));
        }
        response
    }

    fn handle_egui_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let rect = self.screen_rect;
        let (touch, touch_cancelled, pressed, released, press_origin) = ui.input(|i| {
            let touch = i.any_touches()
                || i
                    .events
                    .iter()
                    .any(|e| matches!(e, egui::Event::Touch { .. }));
            let touch_cancelled = i.events.iter().any(|e| {
                matches!(
                    e,
                    egui::Event::Touch {
                        phase: egui::TouchPhase::Cancel,
                        ..
                    }
                )
            });
            (
                touch,
                touch_cancelled,
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.press_origin(),
            )
        });
        let now = self.clock.now_ms();

        if touch_cancelled {
            self.handle_pointer(PointerEvent::Cancel, now);
            self.touch_target = None;
        }

        self.hovered = response.hover_pos().and_then(|p| self.hit_test(p));

        // Node-targeted events: press/release become gestures
        let mut consumed = false;
        if touch {
            if pressed && response.hovered() {
                if let Some(id) = press_origin.and_then(|p| self.hit_test(p)) {
                    let outcome = self.handle_pointer(PointerEvent::touch_start(id.clone()), now);
                    consumed |= outcome.propagation == Propagation::Stop;
                    self.touch_target = Some(id);
                }
            }
            if released {
                if let Some(id) = self.touch_target.take() {
                    let outcome = self.handle_pointer(PointerEvent::touch_end(id), now);
                    consumed |= outcome.propagation == Propagation::Stop;
                }
            }
        } else if response.clicked() {
            if let Some(id) = response.interact_pointer_pos().and_then(|p| self.hit_test(p)) {
                let outcome = self.handle_pointer(PointerEvent::mouse_down(id), now);
                consumed |= outcome.propagation == Propagation::Stop;
            }
        }

        // Drag: a node if the drag began on one, otherwise pan
        if response.drag_started() {
            if let Some(id) = press_origin.and_then(|p| self.hit_test(p)) {
                self.begin_drag(id.as_str());
            }
        }
        if response.dragged() {
            match self.dragging.clone() {
                Some(id) => {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let world = self.camera.screen_to_world(pos, rect);
                        self.drag_to(id.as_str(), world);
                    }
                }
                None if !consumed => self.camera.pan(response.drag_delta()),
                None => {}
            }
        }
        if response.drag_stopped() {
            if let Some(id) = self.dragging.clone() {
                self.end_drag(id.as_str());
            }
        }

        // Wheel / pinch zoom around the pointer
        if response.hovered() && !consumed {
            let (scroll, pinch, pointer) = ui.input(|i| {
                (i.smooth_scroll_delta.y, i.zoom_delta(), i.pointer.hover_pos())
            });
            let factor = pinch * (scroll * SCROLL_ZOOM_SPEED).exp();
            if (factor - 1.0).abs() > f32::EPSILON {
                let anchor = pointer.unwrap_or(rect.center());
                self.camera.zoom_at(factor, anchor, rect);
            }
        }

        if !ui.ctx().wants_keyboard_input() {
            let (fit, escape) = ui.input(|i| {
                (
                    i.key_pressed(Key::R) || i.key_pressed(Key::F),
                    i.key_pressed(Key::Escape),
                )
            });
            if fit {
                self.fit_view();
            }
            if escape {
                self.close_detail();
            }
        }
    }

    fn paint(&self, painter: &egui::Painter) {
        let visuals: Vec<NodeVisual<'_>> = self
            .graph
            .nodes
            .iter()
            .filter_map(|node| {
                let center = self.sim.position(node.id.as_str())?;
                let anim = self.anims.get(&node.id)?;
                Some(NodeVisual {
                    node,
                    center,
                    side: anim.side.get(),
                    appear: anim.appear.get().max(0.0),
                    expanded: self.state.is_expanded(node.id.as_str()),
                    visited: self.state.is_visited(node.id.as_str()),
                })
            })
            .collect();
        // Visuals follow graph order, so graph indices address them when complete
        let edges: Vec<(usize, usize)> = if visuals.len() == self.graph.len() {
            self.graph
                .edges
                .iter()
                .filter_map(|e| {
                    Some((
                        self.graph.index_of(e.source.as_str())?,
                        self.graph.index_of(e.target.as_str())?,
                    ))
                })
                .collect()
        } else {
            Vec::new()
        };

        let ctx = RenderContext {
            camera: &self.camera,
            screen_rect: self.screen_rect,
            compact: self.compact,
            node_settings: &self.settings.nodes,
        };
        if self.sim.is_ready() {
            self.renderer.render(painter, &visuals, &edges, &ctx);
        }
        self.renderer
            .render_progress(painter, &self.state.progress_report(), self.screen_rect);
        if self.compact {
            self.renderer.render_compact_hint(painter, self.screen_rect);
        }
    }
}

impl Drop for MindMapSurface {
    fn drop(&mut self) {
        self.teardown();
    }
}
