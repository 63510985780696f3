//! Pan/zoom camera over the layout's pixel space
//!
//! At zoom 1 with the camera on the viewport center, world and local screen
//! coordinates coincide. Zoom and center ease toward their targets; drag
//! panning and [`Camera2D::snap`] bypass the easing.

use super::animation::{SpringConfig, SpringF32, SpringVec2};
use crate::config::{AnimationSettings, CameraSettings};
use egui::{Pos2, Rect, Vec2};

#[derive(Debug, Clone)]
pub struct Camera2D {
    /// World point shown at the viewport center
    center: SpringVec2,
    zoom: SpringF32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(&CameraSettings::default(), &AnimationSettings::default())
    }
}

impl Camera2D {
    /// Center eases with the `medium` spring, zoom with `fast`.
    pub fn new(settings: &CameraSettings, animation: &AnimationSettings) -> Self {
        Self {
            center: SpringVec2::with_config(
                Pos2::ZERO,
                SpringConfig::from_settings(animation, "medium"),
            ),
            zoom: SpringF32::with_config(1.0, SpringConfig::from_settings(animation, "fast")),
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
        }
    }

    pub fn center(&self) -> Pos2 {
        self.center.get()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.get()
    }

    pub fn target_zoom(&self) -> f32 {
        self.zoom.target()
    }

    /// Advance easing. Call once per frame before transforming.
    pub fn update(&mut self, dt: f32) {
        self.center.tick(dt);
        self.zoom.tick(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.center.is_animating() || self.zoom.is_animating()
    }

    /// Jump to a view with no easing.
    pub fn snap(&mut self, center: Pos2, zoom: f32) {
        self.center.set_immediate(center);
        self.zoom.set_immediate(self.clamp_zoom(zoom));
    }

    /// Move the view by a screen-space drag delta.
    pub fn pan(&mut self, screen_delta: Vec2) {
        let moved = self.center.target() - screen_delta / self.zoom.get();
        self.center.set_immediate(moved);
    }

    /// Scale zoom by `factor`, keeping the world point under `anchor` in place.
    pub fn zoom_at(&mut self, factor: f32, anchor: Pos2, screen_rect: Rect) {
        let from = self.zoom.target();
        let to = self.clamp_zoom(from * factor);
        if (to - from).abs() <= 1e-3 {
            return;
        }
        let offset = anchor - screen_rect.center();
        let shift = offset / from - offset / to;
        self.center.set_target(self.center.target() + shift);
        self.zoom.set_target(to);
    }

    /// Ease so `bounds` fills the viewport minus `padding`.
    pub fn fit_to_bounds(&mut self, bounds: Rect, screen_rect: Rect, padding: f32) {
        if bounds.is_negative() || bounds.width() < 1.0 || bounds.height() < 1.0 {
            return;
        }
        let room = screen_rect.shrink(padding);
        let zoom = self.clamp_zoom((room.width() / bounds.width()).min(room.height() / bounds.height()));
        tracing::debug!(zoom, "fit to bounds");
        self.center.set_target(bounds.center());
        self.zoom.set_target(zoom);
    }

    pub fn world_to_screen(&self, world: Pos2, screen_rect: Rect) -> Pos2 {
        screen_rect.center() + (world - self.center()) * self.zoom()
    }

    pub fn screen_to_world(&self, screen: Pos2, screen_rect: Rect) -> Pos2 {
        self.center() + (screen - screen_rect.center()) / self.zoom()
    }

    /// World-space rectangle currently on screen.
    pub fn visible_bounds(&self, screen_rect: Rect) -> Rect {
        Rect::from_center_size(self.center(), screen_rect.size() / self.zoom())
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
