//! Force-directed layout for the visible graph
//!
//! Semi-implicit Euler simulation with a decaying temperature (alpha):
//! - Link springs pull each parent/child pair toward `link_distance`
//! - Many-body charge repels every pair (inverse square)
//! - Centering shifts the whole graph so its mean sits on the viewport center
//! - Collision pushes overlapping circles apart, split by radius
//!
//! Positions are kept by id across [`ForceSimulation::sync`] calls so the
//! layout animates from where it was instead of jumping.
//!
//! # Usage
//! ```ignore
//! let mut sim = ForceSimulation::new(settings.layout.regular.clone());
//! sim.set_viewport(Vec2::new(1280.0, 800.0));
//! sim.sync(&visible);
//!
//! // Each frame:
//! sim.tick(dt);
//! for node in sim.nodes() {
//!     draw_square(node.position, side(node.category));
//! }
//! ```

use super::projection::VisibleGraph;
use crate::config::CategoryMetric;
use egui::{Pos2, Rect, Vec2};
use mindmap_types::{Category, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed simulation tick (seconds)
pub const TICK_SECONDS: f32 = 1.0 / 60.0;

/// Backlog beyond this many ticks per step is dropped.
pub const MAX_TICKS_PER_STEP: u32 = 4;

const GOLDEN_ANGLE: f32 = 2.399_963;

/// Newly placed nodes sit within this radius of the center.
const SPAWN_JITTER: f32 = 0.9;

// =============================================================================
// SIMULATION CONFIG
// =============================================================================

/// Force parameters. Units are pixels and ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Rest length of parent/child links
    pub link_distance: f32,
    /// Multiplier on the per-link strength 1 / min(degree)
    pub link_strength: f32,
    /// Many-body strength (negative repels)
    pub charge_strength: f32,
    /// Distances below this are softened to avoid blow-ups
    pub charge_distance_min: f32,
    /// Collision circle per category
    pub collision_radius: CategoryMetric,
    pub collision_strength: f32,
    pub center_strength: f32,
    /// Fraction of the gap to the alpha target closed per tick
    pub alpha_decay: f32,
    /// Below this the simulation is settled
    pub alpha_min: f32,
    /// Fraction of velocity lost per tick
    pub velocity_decay: f32,
    /// Alpha target while a node is dragged
    pub reheat_alpha_target: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self::regular()
    }
}

impl ForceConfig {
    /// Wide viewports
    pub fn regular() -> Self {
        Self {
            link_distance: 120.0,
            link_strength: 1.0,
            charge_strength: -500.0,
            charge_distance_min: 1.0,
            collision_radius: CategoryMetric::new(60.0, 50.0, 40.0, 40.0),
            collision_strength: 1.0,
            center_strength: 1.0,
            alpha_decay: 0.0228,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            reheat_alpha_target: 0.3,
        }
    }

    /// Narrow viewports: shorter links, weaker charge, smaller circles
    pub fn compact() -> Self {
        Self {
            link_distance: 100.0,
            charge_strength: -300.0,
            collision_radius: CategoryMetric::new(52.0, 42.0, 34.0, 34.0),
            ..Self::regular()
        }
    }
}

// =============================================================================
// SIM NODE
// =============================================================================

#[derive(Debug, Clone)]
pub struct SimNode {
    pub id: NodeId,
    pub category: Category,
    pub position: Pos2,
    pub velocity: Vec2,
    /// Fixed position while dragged
    pub pinned: Option<Pos2>,
    /// Collision radius
    pub radius: f32,
    /// False until the node has been given a starting position
    placed: bool,
}

impl SimNode {
    pub fn new(id: impl Into<NodeId>, category: Category, radius: f32) -> Self {
        Self {
            id: id.into(),
            category,
            position: Pos2::ZERO,
            velocity: Vec2::ZERO,
            pinned: None,
            radius,
            placed: false,
        }
    }

    /// Builder: start at a known position
    pub fn at(mut self, position: Pos2) -> Self {
        self.position = position;
        self.placed = true;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

// =============================================================================
// SIM STATE + STEP
// =============================================================================

/// Complete simulation state. Advanced by [`step`].
#[derive(Debug, Clone)]
pub struct SimState {
    pub nodes: Vec<SimNode>,
    /// (source, target) indices into `nodes`
    pub links: Vec<(usize, usize)>,
    pub alpha: f32,
    pub alpha_target: f32,
    pub center: Pos2,
    pub config: ForceConfig,
    /// Unconsumed time below one tick
    pending_time: f32,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            alpha: 1.0,
            alpha_target: 0.0,
            center: Pos2::ZERO,
            config: ForceConfig::default(),
            pending_time: 0.0,
        }
    }
}

impl SimState {
    pub fn new(nodes: Vec<SimNode>, links: Vec<(usize, usize)>, config: ForceConfig) -> Self {
        Self {
            nodes,
            links,
            config,
            ..Self::default()
        }
    }

    pub fn with_center(mut self, center: Pos2) -> Self {
        self.center = center;
        self
    }

    /// Temperature has decayed and nothing is holding it up.
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes.iter().map(|n| n.velocity.length_sq()).sum()
    }
}

/// Advance the simulation by `dt` seconds of wall time.
///
/// Runs whole ticks of [`TICK_SECONDS`], at most [`MAX_TICKS_PER_STEP`].
/// A settled or empty state is returned unchanged.
pub fn step(mut state: SimState, dt: f32) -> SimState {
    if state.nodes.is_empty() || state.is_settled() {
        state.pending_time = 0.0;
        return state;
    }

    state.pending_time += dt.max(0.0);
    let due = (state.pending_time / TICK_SECONDS).floor() as u32;
    let ticks = due.min(MAX_TICKS_PER_STEP);
    if due > MAX_TICKS_PER_STEP {
        state.pending_time = 0.0;
    } else {
        state.pending_time -= ticks as f32 * TICK_SECONDS;
    }

    for _ in 0..ticks {
        tick_once(&mut state);
        if state.is_settled() {
            state.pending_time = 0.0;
            break;
        }
    }
    state
}

fn tick_once(state: &mut SimState) {
    state.alpha += (state.alpha_target - state.alpha) * state.config.alpha_decay;

    apply_links(state);
    apply_charge(state);
    apply_center(state);
    apply_collision(state);

    let keep = 1.0 - state.config.velocity_decay;
    for node in &mut state.nodes {
        if let Some(pin) = node.pinned {
            node.position = pin;
            node.velocity = Vec2::ZERO;
        } else {
            node.velocity *= keep;
            node.position += node.velocity;
        }
    }
}

/// Tiny deterministic offset used when two points coincide on an axis.
fn jiggle(seed: usize) -> f32 {
    ((seed as f32 + 1.0) * GOLDEN_ANGLE).sin() * 1e-6
}

fn nudge_zero(mut d: Vec2, seed: usize) -> Vec2 {
    if d.x == 0.0 {
        d.x = jiggle(seed);
    }
    if d.y == 0.0 {
        d.y = jiggle(seed + 1);
    }
    d
}

fn apply_links(state: &mut SimState) {
    let n = state.nodes.len();
    let mut degree = vec![0usize; n];
    for &(s, t) in &state.links {
        degree[s] += 1;
        degree[t] += 1;
    }

    let alpha = state.alpha;
    let cfg = &state.config;
    for (k, &(s, t)) in state.links.iter().enumerate() {
        let src = state.nodes[s].position + state.nodes[s].velocity;
        let tgt = state.nodes[t].position + state.nodes[t].velocity;
        let d = nudge_zero(tgt - src, k);
        let l = d.length();

        let strength = cfg.link_strength / degree[s].min(degree[t]) as f32;
        let pull = d * ((l - cfg.link_distance) / l * alpha * strength);
        let bias = degree[s] as f32 / (degree[s] + degree[t]) as f32;

        state.nodes[t].velocity -= pull * bias;
        state.nodes[s].velocity += pull * (1.0 - bias);
    }
}

fn apply_charge(state: &mut SimState) {
    let n = state.nodes.len();
    let scale = state.config.charge_strength * state.alpha;
    let dmin2 = state.config.charge_distance_min * state.config.charge_distance_min;

    for i in 0..n {
        let pi = state.nodes[i].position;
        let mut dv = Vec2::ZERO;
        for j in 0..n {
            if i == j {
                continue;
            }
            let d = nudge_zero(state.nodes[j].position - pi, i * n + j);
            let mut l = d.length_sq();
            if l < dmin2 {
                l = (dmin2 * l).sqrt();
            }
            dv += d * (scale / l);
        }
        state.nodes[i].velocity += dv;
    }
}

fn apply_center(state: &mut SimState) {
    let n = state.nodes.len() as f32;
    let sum = state
        .nodes
        .iter()
        .fold(Vec2::ZERO, |acc, node| acc + node.position.to_vec2());
    let shift = (sum / n - state.center.to_vec2()) * state.config.center_strength;
    for node in &mut state.nodes {
        node.position -= shift;
    }
}

fn apply_collision(state: &mut SimState) {
    let n = state.nodes.len();
    let strength = state.config.collision_strength;

    for i in 0..n {
        for j in (i + 1)..n {
            let ri = state.nodes[i].radius;
            let rj = state.nodes[j].radius;
            let r = ri + rj;
            let pi = state.nodes[i].position + state.nodes[i].velocity;
            let pj = state.nodes[j].position + state.nodes[j].velocity;
            let d = pi - pj;
            if d.length_sq() >= r * r {
                continue;
            }
            let d = nudge_zero(d, i * n + j);
            let l = d.length();
            let push = d * ((r - l) / l * strength);

            let ri2 = ri * ri;
            let rj2 = rj * rj;
            let wi = rj2 / (ri2 + rj2);
            state.nodes[i].velocity += push * wi;
            state.nodes[j].velocity -= push * (1.0 - wi);
        }
    }
}

// =============================================================================
// FORCE SIMULATION
// =============================================================================

/// Stateful wrapper over [`SimState`] that tracks ids, viewport and run state.
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    state: SimState,
    index: HashMap<NodeId, usize>,
    /// None until a non-zero viewport is known
    viewport: Option<Vec2>,
    running: bool,
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self::new(ForceConfig::default())
    }
}

impl ForceSimulation {
    pub fn new(config: ForceConfig) -> Self {
        Self {
            state: SimState {
                config,
                ..SimState::default()
            },
            index: HashMap::new(),
            viewport: None,
            running: false,
        }
    }

    pub fn config(&self) -> &ForceConfig {
        &self.state.config
    }

    /// Swap force parameters; radii follow the new config.
    pub fn set_config(&mut self, config: ForceConfig) {
        if config == self.state.config {
            return;
        }
        for node in &mut self.state.nodes {
            node.radius = config.collision_radius.get(node.category);
        }
        self.state.config = config;
    }

    // =========================================================================
    // GRAPH SYNC
    // =========================================================================

    /// Rebuild nodes and links for a new visible graph.
    ///
    /// Nodes that were already present keep position, velocity and pin.
    /// New nodes start near the center. Alpha is reset to 1.
    pub fn sync(&mut self, graph: &VisibleGraph) {
        let mut previous: HashMap<NodeId, SimNode> = std::mem::take(&mut self.state.nodes)
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();

        let mut nodes = Vec::with_capacity(graph.len());
        for visible in &graph.nodes {
            let radius = self.state.config.collision_radius.get(visible.category);
            let node = match previous.remove(&visible.id) {
                Some(mut kept) => {
                    kept.category = visible.category;
                    kept.radius = radius;
                    kept
                }
                None => SimNode::new(visible.id.clone(), visible.category, radius),
            };
            nodes.push(node);
        }

        self.index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        self.state.links = graph
            .edges
            .iter()
            .filter_map(|e| {
                let s = *self.index.get(&e.source)?;
                let t = *self.index.get(&e.target)?;
                Some((s, t))
            })
            .collect();
        self.state.nodes = nodes;

        tracing::debug!(
            nodes = self.state.nodes.len(),
            links = self.state.links.len(),
            dropped = previous.len(),
            "layout synced"
        );

        self.place_unplaced();
        self.restart_hot();
    }

    /// Record the viewport size. Zero area defers the simulation.
    pub fn set_viewport(&mut self, size: Vec2) {
        if !(size.x > 0.0 && size.y > 0.0 && size.is_finite()) {
            if self.viewport.take().is_some() || self.running {
                tracing::debug!(?size, "viewport has no area, layout deferred");
            }
            self.running = false;
            return;
        }
        self.viewport = Some(size);
        self.state.center = (size / 2.0).to_pos2();
        self.place_unplaced();
        self.restart_hot();
    }

    pub fn viewport(&self) -> Option<Vec2> {
        self.viewport
    }

    fn place_unplaced(&mut self) {
        if self.viewport.is_none() {
            return;
        }
        let center = self.state.center;
        let fresh = self.state.nodes.iter().filter(|n| !n.placed).count();
        let mut k = 0;
        for node in self.state.nodes.iter_mut().filter(|n| !n.placed) {
            let r = SPAWN_JITTER * ((k as f32 + 0.5) / fresh as f32).sqrt();
            node.position = center + Vec2::angled(k as f32 * GOLDEN_ANGLE) * r;
            node.velocity = Vec2::ZERO;
            node.placed = true;
            k += 1;
        }
    }

    fn restart_hot(&mut self) {
        self.state.alpha = 1.0;
        self.state.pending_time = 0.0;
        self.restart();
    }

    // =========================================================================
    // RUN STATE
    // =========================================================================

    /// Advance by `dt` seconds. No-op when stopped, deferred or empty.
    pub fn tick(&mut self, dt: f32) {
        if !self.running || self.state.nodes.is_empty() {
            return;
        }
        self.state = step(std::mem::take(&mut self.state), dt);
        tracing::trace!(alpha = self.state.alpha, "layout tick");
        if self.state.is_settled() {
            self.running = false;
            tracing::debug!("layout settled");
        }
    }

    /// Resume ticking without touching alpha. Ignored until a viewport is known.
    pub fn restart(&mut self) {
        self.running = self.is_ready() && !self.state.nodes.is_empty();
    }

    /// Stop ticking. Positions are kept.
    pub fn stop(&mut self) {
        self.running = false;
        self.state.alpha_target = 0.0;
    }

    pub fn is_ready(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_settled(&self) -> bool {
        self.state.is_settled()
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    // =========================================================================
    // DRAG
    // =========================================================================

    /// Pin `id` where it is and reheat so neighbors react.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        let target = self.state.config.reheat_alpha_target;
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.pinned = Some(node.position);
        node.velocity = Vec2::ZERO;
        self.state.alpha_target = target;
        self.restart();
        true
    }

    /// Move the pin of a dragged node.
    pub fn drag_to(&mut self, id: &str, position: Pos2) {
        if let Some(node) = self.node_mut(id) {
            if node.pinned.is_some() {
                node.pinned = Some(position);
                node.position = position;
            }
        }
    }

    /// Release the pin and let the temperature decay again.
    pub fn end_drag(&mut self, id: &str) {
        if let Some(node) = self.node_mut(id) {
            node.pinned = None;
        }
        self.state.alpha_target = 0.0;
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.state.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.index.get(id).map(|&i| &self.state.nodes[i])
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut SimNode> {
        self.index
            .get(id)
            .copied()
            .map(|i| &mut self.state.nodes[i])
    }

    pub fn position(&self, id: &str) -> Option<Pos2> {
        self.node(id).map(|n| n.position)
    }

    pub fn len(&self) -> usize {
        self.state.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.nodes.is_empty()
    }

    /// Topmost node whose collision square contains `pos`.
    pub fn node_at(&self, pos: Pos2) -> Option<&SimNode> {
        self.node_at_with(pos, |n| n.radius)
    }

    /// Topmost node whose square of half-side `half(node)` contains `pos`.
    pub fn node_at_with(&self, pos: Pos2, half: impl Fn(&SimNode) -> f32) -> Option<&SimNode> {
        // Later nodes draw on top
        self.state.nodes.iter().rev().find(|n| {
            let h = half(n);
            let d = pos - n.position;
            d.x.abs() <= h && d.y.abs() <= h
        })
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.state.kinetic_energy()
    }

    /// Bounding box of all collision circles.
    pub fn bounds(&self) -> Option<Rect> {
        let mut nodes = self.state.nodes.iter();
        let first = nodes.next()?;
        let init = Rect::from_center_size(first.position, Vec2::splat(first.radius * 2.0));
        Some(nodes.fold(init, |rect, n| {
            rect.union(Rect::from_center_size(
                n.position,
                Vec2::splat(n.radius * 2.0),
            ))
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::exploration::ExpandedSet;
    use crate::graph::projection::project;
    use crate::graph::tree::ContentTree;
    use mindmap_types::TreeNode;

    fn run(sim: &mut ForceSimulation, ticks: usize) {
        for _ in 0..ticks {
            sim.tick(TICK_SECONDS);
        }
    }

    fn star(children: usize) -> VisibleGraph {
        let mut root = TreeNode::new("root", "Root", Category::Root, "#fff");
        for i in 0..children {
            root = root.with_child(TreeNode::new(
                format!("c{i}"),
                format!("Child {i}"),
                Category::Main,
                "#fff",
            ));
        }
        let tree = ContentTree::new(root).unwrap();
        let expanded: ExpandedSet = ["root"].into_iter().collect();
        project(&tree, &expanded).unwrap()
    }

    #[test]
    fn single_node_converges_to_center() {
        let mut sim = ForceSimulation::default();
        sim.set_viewport(Vec2::new(800.0, 600.0));
        sim.sync(&star(0));
        run(&mut sim, 400);

        let pos = sim.position("root").unwrap();
        assert!((pos - Pos2::new(400.0, 300.0)).length() < 1.0);
        assert!(sim.is_settled());
        assert!(!sim.is_running());
    }

    #[test]
    fn siblings_separate_past_collision_radius() {
        let presets = [
            ("regular", ForceConfig::regular()),
            ("compact", ForceConfig::compact()),
        ];
        for (preset, config) in presets {
            for children in [1, 5, 8, 16] {
                let mut sim = ForceSimulation::new(config.clone());
                sim.set_viewport(Vec2::new(1200.0, 900.0));
                sim.sync(&star(children));
                run(&mut sim, 600);
                assert!(sim.is_settled(), "{preset}/{children} still running");

                let nodes = sim.nodes();
                for i in 0..nodes.len() {
                    for j in (i + 1)..nodes.len() {
                        let dist = (nodes[i].position - nodes[j].position).length();
                        let min = nodes[i].radius + nodes[j].radius;
                        assert!(
                            dist >= min * 0.95,
                            "{preset}/{children}: {} and {} overlap: {dist} < {min}",
                            nodes[i].id,
                            nodes[j].id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn zero_area_viewport_defers() {
        let mut sim = ForceSimulation::default();
        sim.sync(&star(3));
        sim.set_viewport(Vec2::new(0.0, 600.0));
        assert!(!sim.is_ready());
        assert!(!sim.is_running());

        let before = sim.position("c0").unwrap();
        run(&mut sim, 10);
        assert_eq!(sim.position("c0").unwrap(), before);

        sim.set_viewport(Vec2::new(800.0, 600.0));
        assert!(sim.is_running());
        let placed = sim.position("c0").unwrap();
        assert!((placed - Pos2::new(400.0, 300.0)).length() < 1.0);
    }

    #[test]
    fn empty_graph_is_noop() {
        let mut sim = ForceSimulation::default();
        sim.set_viewport(Vec2::new(800.0, 600.0));
        sim.sync(&VisibleGraph::default());
        run(&mut sim, 5);
        assert!(sim.is_empty());
        assert!(sim.bounds().is_none());
    }

    #[test]
    fn positions_survive_resync() {
        let mut sim = ForceSimulation::default();
        sim.set_viewport(Vec2::new(800.0, 600.0));
        sim.sync(&star(3));
        run(&mut sim, 120);
        let before = sim.position("c1").unwrap();

        sim.sync(&star(3));
        assert_eq!(sim.position("c1").unwrap(), before);
        assert_eq!(sim.alpha(), 1.0);

        sim.sync(&star(1));
        assert!(sim.node("c1").is_none());
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn drag_pins_and_reheats() {
        let mut sim = ForceSimulation::default();
        sim.set_viewport(Vec2::new(800.0, 600.0));
        sim.sync(&star(2));
        run(&mut sim, 1000);
        assert!(sim.is_settled());

        assert!(sim.begin_drag("c0"));
        assert!(sim.is_running());
        let target = Pos2::new(50.0, 50.0);
        sim.drag_to("c0", target);
        run(&mut sim, 30);
        assert_eq!(sim.position("c0").unwrap(), target);
        assert!(sim.alpha() > sim.config().alpha_min);

        sim.end_drag("c0");
        assert!(sim.node("c0").unwrap().pinned.is_none());
        run(&mut sim, 1000);
        assert!(sim.is_settled());
    }

    #[test]
    fn step_drops_backlog() {
        let state = SimState::new(
            vec![SimNode::new("a", Category::Root, 10.0).at(Pos2::new(5.0, 5.0))],
            Vec::new(),
            ForceConfig::regular(),
        );
        let after = step(state, 10.0);
        // Four ticks at most, no stored backlog
        let expected = 1.0 - (1.0 - ForceConfig::regular().alpha_decay).powi(4);
        assert!((1.0 - after.alpha - expected).abs() < 1e-4);
        let again = step(after.clone(), 0.0);
        assert_eq!(again.alpha, after.alpha);
    }

    #[test]
    fn hit_testing_prefers_topmost() {
        let mut sim = ForceSimulation::default();
        sim.set_viewport(Vec2::new(800.0, 600.0));
        sim.sync(&star(1));
        // Both nodes start at the center; the later one wins
        let hit = sim.node_at(Pos2::new(400.0, 300.0)).unwrap();
        assert_eq!(hit.id.as_str(), "c0");
        assert!(sim.node_at(Pos2::new(-500.0, -500.0)).is_none());
    }
}
