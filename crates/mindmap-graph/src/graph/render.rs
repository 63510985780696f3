//! Rendering - draws edges, nodes and overlays using egui::Painter
//!
//! Node geometry is in world coordinates and transformed by the camera.
//! Overlays (progress panel, hint) are in screen coordinates.

use super::camera::Camera2D;
use super::colors::{self, apply_opacity, node_fill};
use super::exploration::ProgressReport;
use super::projection::VisibleNode;
use crate::config::NodeSettings;
use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke, Vec2};
use mindmap_types::Category;

// =============================================================================
// RENDER CONSTANTS
// =============================================================================

const SHADOW_OFFSET: f32 = 4.0;
const ARROW_LENGTH: f32 = 10.0;
const ARROW_HALF_WIDTH: f32 = 5.0;
const PANEL_WIDTH: f32 = 220.0;
const PANEL_MARGIN: f32 = 16.0;
const PANEL_PADDING: f32 = 12.0;

/// Everything needed to draw one node this frame.
#[derive(Debug, Clone)]
pub struct NodeVisual<'a> {
    pub node: &'a VisibleNode,
    /// World position
    pub center: Pos2,
    /// Side length in world units, hover growth already applied
    pub side: f32,
    /// Entry animation in [0, 1]
    pub appear: f32,
    pub expanded: bool,
    pub visited: bool,
}

impl NodeVisual<'_> {
    /// Has children that are currently hidden.
    pub fn is_collapsed_parent(&self) -> bool {
        self.node.has_children && !self.expanded
    }
}

/// Per-frame rendering inputs
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub camera: &'a Camera2D,
    pub screen_rect: Rect,
    pub compact: bool,
    pub node_settings: &'a NodeSettings,
}

impl RenderContext<'_> {
    fn to_screen(&self, world: Pos2) -> Pos2 {
        self.camera.world_to_screen(world, self.screen_rect)
    }

    fn zoom(&self) -> f32 {
        self.camera.zoom()
    }
}

// =============================================================================
// GRAPH RENDERER
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct GraphRenderer;

impl GraphRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw edges below nodes. `edges` index into `nodes`.
    pub fn render(
        &self,
        painter: &egui::Painter,
        nodes: &[NodeVisual<'_>],
        edges: &[(usize, usize)],
        ctx: &RenderContext<'_>,
    ) {
        for &(s, t) in edges {
            if let (Some(source), Some(target)) = (nodes.get(s), nodes.get(t)) {
                self.render_edge(painter, source, target, ctx);
            }
        }
        for visual in nodes {
            self.render_node(painter, visual, ctx);
        }
    }

    fn render_edge(
        &self,
        painter: &egui::Painter,
        source: &NodeVisual<'_>,
        target: &NodeVisual<'_>,
        ctx: &RenderContext<'_>,
    ) {
        let from = ctx.to_screen(source.center);
        let to = ctx.to_screen(target.center);
        let delta = to - from;
        if delta.length_sq() < 1.0 {
            return;
        }
        let dir = delta.normalized();
        let opacity = colors::EDGE_OPACITY * source.appear.min(target.appear);
        let color = apply_opacity(colors::EDGE, opacity);
        let width = if ctx.compact { 1.5 } else { 2.0 } * ctx.zoom().max(0.5);

        // Arrow tip sits on the target square's outline
        let half = target.side * target.appear * ctx.zoom() / 2.0;
        let to_edge = half / dir.x.abs().max(dir.y.abs()).max(1e-3);
        let tip = to - dir * to_edge;
        if (tip - from).dot(dir) <= 0.0 {
            return;
        }

        painter.line_segment([from, tip], Stroke::new(width, color));
        render_arrow_head(painter, tip, dir, ctx.zoom(), color);
    }

    fn render_node(&self, painter: &egui::Painter, visual: &NodeVisual<'_>, ctx: &RenderContext<'_>) {
        if visual.appear <= 0.01 {
            return;
        }
        let zoom = ctx.zoom();
        let center = ctx.to_screen(visual.center);
        let side = visual.side * visual.appear * zoom;
        let rect = Rect::from_center_size(center, Vec2::splat(side));
        if !ctx.screen_rect.expand(side).intersects(rect) {
            return;
        }
        let opacity = visual.appear.clamp(0.0, 1.0);

        // Pixel drop shadow
        painter.rect_filled(
            rect.translate(Vec2::splat(SHADOW_OFFSET * zoom)),
            Rounding::ZERO,
            apply_opacity(colors::SHADOW, opacity),
        );
        painter.rect_filled(
            rect,
            Rounding::ZERO,
            apply_opacity(node_fill(&visual.node.color), opacity),
        );

        if visual.is_collapsed_parent() {
            let (width, dash, gap) = if ctx.compact {
                (3.0, 6.0, 3.0)
            } else {
                (4.0, 8.0, 4.0)
            };
            let stroke = Stroke::new(width * zoom, apply_opacity(colors::COLLAPSED_STROKE, opacity));
            draw_dashed_rect(painter, rect, stroke, dash * zoom, gap * zoom);
        } else {
            let width = if ctx.compact { 2.0 } else { 3.0 };
            painter.rect_stroke(
                rect,
                Rounding::ZERO,
                Stroke::new(width * zoom, apply_opacity(colors::NODE_STROKE, opacity)),
            );
        }

        let icon_font = FontId::monospace(icon_size(visual.node.category, ctx.compact) * zoom);
        draw_shadowed_text(
            painter,
            center,
            Align2::CENTER_CENTER,
            &visual.node.icon,
            icon_font,
            opacity,
            2.0 * zoom,
        );

        let label = ctx.node_settings.label(&visual.node.name, ctx.compact);
        let label_pos = center + Vec2::new(0.0, label_offset(visual.node.category, ctx.compact) * zoom);
        let label_font =
            FontId::proportional(label_size(visual.node.category, ctx.compact) * zoom);
        draw_shadowed_text(
            painter,
            label_pos,
            Align2::CENTER_CENTER,
            &label,
            label_font,
            opacity,
            1.0 * zoom,
        );

        if visual.visited {
            let r = if ctx.compact { 4.0 } else { 5.0 } * zoom;
            let inset = 8.0 * zoom;
            let dot = Pos2::new(rect.right() - inset, rect.top() + inset);
            painter.circle(
                dot,
                r,
                apply_opacity(colors::VISITED, opacity),
                Stroke::new(1.0, apply_opacity(Color32::WHITE, opacity)),
            );
        }
    }

    // =========================================================================
    // OVERLAYS
    // =========================================================================

    /// Bottom-right progress panel.
    pub fn render_progress(&self, painter: &egui::Painter, report: &ProgressReport, screen_rect: Rect) {
        let mut height = PANEL_PADDING * 2.0 + 18.0 + 8.0 + 16.0;
        if report.viewing.is_some() {
            height += 18.0;
        }
        if report.complete() {
            height += 18.0;
        }
        let rect = Rect::from_min_size(
            Pos2::new(
                screen_rect.right() - PANEL_MARGIN - PANEL_WIDTH,
                screen_rect.bottom() - PANEL_MARGIN - height,
            ),
            Vec2::new(PANEL_WIDTH, height),
        );
        painter.rect(
            rect,
            Rounding::ZERO,
            colors::PANEL_BACKGROUND,
            Stroke::new(2.0, colors::PANEL_BORDER),
        );

        let mut cursor = rect.min + Vec2::splat(PANEL_PADDING);
        painter.text(
            cursor,
            Align2::LEFT_TOP,
            "PROGRESS",
            FontId::monospace(12.0),
            colors::ACCENT,
        );
        painter.text(
            cursor + Vec2::new(80.0, 0.0),
            Align2::LEFT_TOP,
            format!("[{}/{}]", report.visited, report.total),
            FontId::monospace(12.0),
            Color32::GRAY,
        );
        cursor.y += 26.0;

        let track = Rect::from_min_size(cursor, Vec2::new(PANEL_WIDTH - PANEL_PADDING * 2.0, 16.0));
        painter.rect(
            track,
            Rounding::ZERO,
            colors::BACKGROUND,
            Stroke::new(2.0, colors::PANEL_BORDER),
        );
        let filled = Rect::from_min_size(
            track.min,
            Vec2::new(track.width() * report.fraction(), track.height()),
        );
        painter.rect_filled(filled, Rounding::ZERO, colors::ACCENT);
        // Pixel texture over the bar
        let mut x = track.left() + 2.0;
        while x < filled.right() {
            painter.line_segment(
                [Pos2::new(x, track.top()), Pos2::new(x, track.bottom())],
                Stroke::new(2.0, colors::PROGRESS_TRACK),
            );
            x += 4.0;
        }
        cursor.y += 24.0;

        if let Some(id) = &report.viewing {
            painter.text(
                cursor,
                Align2::LEFT_TOP,
                format!("● VIEWING {}", id.as_str().to_uppercase()),
                FontId::monospace(12.0),
                colors::VISITED,
            );
            cursor.y += 18.0;
        }
        if report.complete() {
            painter.text(
                cursor,
                Align2::LEFT_TOP,
                "✓ QUEST_COMPLETE!",
                FontId::monospace(12.0),
                colors::ACCENT,
            );
        }
    }

    /// Top-left usage hint shown on narrow viewports.
    pub fn render_compact_hint(&self, painter: &egui::Painter, screen_rect: Rect) {
        let pos = screen_rect.min + Vec2::new(8.0, 8.0);
        let galley = painter.layout_no_wrap(
            "Tap to view • Hold to expand".to_owned(),
            FontId::monospace(11.0),
            colors::VISITED,
        );
        let rect = Rect::from_min_size(pos, galley.size() + Vec2::new(16.0, 8.0));
        painter.rect(
            rect,
            Rounding::ZERO,
            colors::PANEL_BACKGROUND,
            Stroke::new(1.0, colors::PANEL_BORDER),
        );
        painter.galley(pos + Vec2::new(8.0, 4.0), galley, colors::VISITED);
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn icon_size(category: Category, compact: bool) -> f32 {
    match (category, compact) {
        (Category::Root, false) => 24.0,
        (Category::Main, false) => 20.0,
        (_, false) => 16.0,
        (Category::Root, true) => 20.0,
        (Category::Main, true) => 16.0,
        (_, true) => 12.0,
    }
}

fn label_size(category: Category, compact: bool) -> f32 {
    match (category, compact) {
        (Category::Root, false) => 18.0,
        (_, false) => 16.0,
        (Category::Root, true) => 16.0,
        (_, true) => 14.0,
    }
}

/// Distance from node center to label center.
fn label_offset(category: Category, compact: bool) -> f32 {
    match (category, compact) {
        (Category::Root, false) => 70.0,
        (Category::Main, false) => 60.0,
        (_, false) => 50.0,
        (Category::Root, true) => 55.0,
        (Category::Main, true) => 45.0,
        (_, true) => 35.0,
    }
}

fn draw_shadowed_text(
    painter: &egui::Painter,
    pos: Pos2,
    anchor: Align2,
    text: &str,
    font: FontId,
    opacity: f32,
    shadow: f32,
) {
    painter.text(
        pos + Vec2::splat(shadow),
        anchor,
        text,
        font.clone(),
        apply_opacity(colors::TEXT_SHADOW, opacity),
    );
    painter.text(pos, anchor, text, font, apply_opacity(colors::TEXT, opacity));
}

/// Filled triangle with its tip at `tip`, pointing along `dir`.
pub fn render_arrow_head(painter: &egui::Painter, tip: Pos2, dir: Vec2, zoom: f32, color: Color32) {
    let len = ARROW_LENGTH * zoom.max(0.5);
    let half = ARROW_HALF_WIDTH * zoom.max(0.5);
    let base = tip - dir * len;
    let normal = dir.rot90();
    painter.add(egui::Shape::convex_polygon(
        vec![tip, base + normal * half, base - normal * half],
        color,
        Stroke::NONE,
    ));
}

pub fn draw_dashed_line(
    painter: &egui::Painter,
    from: Pos2,
    to: Pos2,
    stroke: Stroke,
    dash_len: f32,
    gap_len: f32,
) {
    let length = (to - from).length();
    if length <= f32::EPSILON || dash_len <= 0.0 {
        return;
    }
    let dir = (to - from) / length;
    let segment_len = dash_len + gap_len.max(0.0);

    let mut dist = 0.0;
    while dist < length {
        let start = from + dir * dist;
        let end = from + dir * (dist + dash_len).min(length);
        painter.line_segment([start, end], stroke);
        dist += segment_len;
    }
}

fn draw_dashed_rect(painter: &egui::Painter, rect: Rect, stroke: Stroke, dash: f32, gap: f32) {
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    for i in 0..4 {
        draw_dashed_line(painter, corners[i], corners[(i + 1) % 4], stroke, dash, gap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_types::NodeId;

    #[test]
    fn compact_sizes_are_smaller() {
        for &category in Category::all() {
            assert!(icon_size(category, true) < icon_size(category, false));
            assert!(label_offset(category, true) < label_offset(category, false));
        }
    }

    #[test]
    fn collapsed_parent_needs_children() {
        let node = VisibleNode {
            id: "a".into(),
            name: "A".into(),
            category: Category::Main,
            color: "#fff".into(),
            icon: "*".into(),
            depth: 1,
            has_children: true,
        };
        let mut visual = NodeVisual {
            node: &node,
            center: Pos2::ZERO,
            side: 60.0,
            appear: 1.0,
            expanded: false,
            visited: false,
        };
        assert!(visual.is_collapsed_parent());
        visual.expanded = true;
        assert!(!visual.is_collapsed_parent());
    }

    #[test]
    fn painting_does_not_panic_headless() {
        let ctx = egui::Context::default();
        let node = VisibleNode {
            id: "root".into(),
            name: "A very long root name".into(),
            category: Category::Root,
            color: "#41b3ff".into(),
            icon: "@".into(),
            depth: 0,
            has_children: true,
        };
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let painter = ui.painter();
                let camera = Camera2D::default();
                let settings = NodeSettings::default();
                let render_ctx = RenderContext {
                    camera: &camera,
                    screen_rect: ui.max_rect(),
                    compact: true,
                    node_settings: &settings,
                };
                let nodes = [
                    NodeVisual {
                        node: &node,
                        center: Pos2::ZERO,
                        side: 80.0,
                        appear: 1.0,
                        expanded: false,
                        visited: true,
                    },
                    NodeVisual {
                        node: &node,
                        center: Pos2::new(120.0, 0.0),
                        side: 80.0,
                        appear: 0.5,
                        expanded: true,
                        visited: false,
                    },
                ];
                let renderer = GraphRenderer::new();
                renderer.render(painter, &nodes, &[(0, 1)], &render_ctx);
                let report = ProgressReport {
                    visited: 3,
                    total: 3,
                    viewing: Some(NodeId::from("a")),
                };
                renderer.render_progress(painter, &report, ui.max_rect());
                renderer.render_compact_hint(painter, ui.max_rect());
            });
        });
    }
}
