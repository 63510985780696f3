//! Viewer Application
//!
//! Layout:
//! ┌──────────────────────────────┬──────────────┐
//! │                              │  Detail      │
//! │  Mind map (central)          │  (selected   │
//! │                              │   node only) │
//! └──────────────────────────────┴──────────────┘

use eframe::egui;
use egui::{Color32, RichText};
use mindmap_graph::MindMapSurface;
use mindmap_types::Category;

const DETAIL_PANEL_WIDTH: f32 = 320.0;

/// Snapshot of the selected node for the detail panel
#[derive(Debug, Clone, PartialEq)]
struct DetailView {
    icon: String,
    name: String,
    category: Category,
    color: String,
    description: Option<String>,
    details: Vec<String>,
    children: Vec<(String, Option<String>)>,
}

impl DetailView {
    fn from_surface(surface: &MindMapSurface) -> Option<Self> {
        let state = surface.state();
        let node = state.selected_node()?;
        let children = state
            .tree()
            .children(node.id.as_str())
            .map(|c| (format!("{} {}", c.icon_or_default(), c.name), c.description.clone()))
            .collect();
        Some(Self {
            icon: node.icon_or_default().to_string(),
            name: node.name.clone(),
            category: node.category,
            color: node.color.clone(),
            description: node.description.clone(),
            details: node.details.clone(),
            children,
        })
    }
}

/// Main application state
pub struct MindMapApp {
    surface: MindMapSurface,
}

impl MindMapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, surface: MindMapSurface) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        Self { surface }
    }

    pub fn surface(&self) -> &MindMapSurface {
        &self.surface
    }

    /// Returns true when the close button was pressed.
    fn detail_panel(ui: &mut egui::Ui, view: &DetailView) -> bool {
        let mut close = false;
        let accent = mindmap_graph::graph::colors::node_fill(&view.color);

        ui.horizontal(|ui| {
            ui.label(RichText::new(&view.icon).size(28.0).color(accent));
            ui.vertical(|ui| {
                ui.heading(&view.name);
                ui.label(
                    RichText::new(view.category.display_name())
                        .small()
                        .color(Color32::GRAY),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                close |= ui.button("✕").on_hover_text("Close (Esc)").clicked();
            });
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            if let Some(description) = &view.description {
                ui.label(RichText::new("Overview").strong());
                ui.label(description);
                ui.add_space(8.0);
            }
            if !view.details.is_empty() {
                ui.label(RichText::new("Details").strong());
                for detail in &view.details {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new("›").color(accent));
                        ui.label(detail);
                    });
                }
                ui.add_space(8.0);
            }
            if !view.children.is_empty() {
                ui.label(RichText::new("Contains").strong());
                for (title, description) in &view.children {
                    ui.group(|ui| {
                        ui.label(title);
                        if let Some(d) = description {
                            ui.label(RichText::new(d).small().color(Color32::GRAY));
                        }
                    });
                }
            }
        });

        ui.separator();
        close |= ui.button("Close").clicked();
        close
    }
}

impl eframe::App for MindMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // =====================================================================
        // DETAIL PANEL - only while a node is selected
        // =====================================================================
        if let Some(view) = DetailView::from_surface(&self.surface) {
            let mut close = false;
            egui::SidePanel::right("detail")
                .resizable(true)
                .default_width(DETAIL_PANEL_WIDTH)
                .show(ctx, |ui| {
                    close = Self::detail_panel(ui, &view);
                });
            if close {
                self.surface.close_detail();
            }
        }

        // =====================================================================
        // CENTRAL PANEL - mind map surface
        // =====================================================================
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.surface.ui(ui);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_graph::GraphSettings;
    use mindmap_input::PointerEvent;
    use mindmap_types::TreeNode;
    use pretty_assertions::assert_eq;

    #[test]
    fn detail_view_follows_selection() {
        let root = TreeNode::new("root", "Root", Category::Root, "#00ff41").with_child(
            TreeNode::new("a", "Alpha", Category::Main, "#41b3ff")
                .with_description("First")
                .with_detail("one")
                .with_child(TreeNode::new("a1", "Leaf", Category::Sub, "#ffffff")),
        );
        let mut surface = MindMapSurface::new(root, GraphSettings::default()).unwrap();
        assert_eq!(DetailView::from_surface(&surface), None);

        surface.handle_pointer(PointerEvent::touch_start("a"), 0);
        surface.handle_pointer(PointerEvent::touch_end("a"), 50);

        let view = DetailView::from_surface(&surface).unwrap();
        assert_eq!(view.name, "Alpha");
        assert_eq!(view.description.as_deref(), Some("First"));
        assert_eq!(view.details, vec!["one".to_string()]);
        assert_eq!(view.children.len(), 1);

        surface.close_detail();
        assert_eq!(DetailView::from_surface(&surface), None);
    }
}
