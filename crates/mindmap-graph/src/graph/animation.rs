//! Spring animation for node growth, node entry and camera motion
//!
//! Presets are named in `config/graph_settings.yaml` (`fast`, `medium`,
//! `slow`, `bouncy`). Values are polled, never pushed: call `tick(dt)` once
//! per frame, then read `get()`.

use crate::config::{global_config, AnimationSettings, SpringConfigYaml};
use egui::{Pos2, Vec2};

/// Largest step fed to the integrator; longer frames are clamped.
const MAX_SPRING_DT: f32 = 0.1;
const REST_DISTANCE: f32 = 1e-4;
const REST_SPEED: f32 = 1e-3;

/// Spring parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Typical range 80-300
    pub stiffness: f32,
    /// Damping ratio. 1.0 is critical, below that overshoots
    pub damping: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::from_preset("medium")
    }
}

impl From<SpringConfigYaml> for SpringConfig {
    fn from(yaml: SpringConfigYaml) -> Self {
        Self {
            stiffness: yaml.stiffness,
            damping: yaml.damping,
        }
    }
}

impl SpringConfig {
    /// Named preset from the bundled settings; unknown names give `medium`.
    pub fn from_preset(name: &str) -> Self {
        global_config().animation.spring(name).into()
    }

    pub fn from_settings(settings: &AnimationSettings, name: &str) -> Self {
        settings.spring(name).into()
    }

    /// Acceleration for a displacement from target and a velocity.
    fn acceleration(&self, displacement: f32, velocity: f32) -> f32 {
        let friction = self.damping * 2.0 * self.stiffness.sqrt();
        -self.stiffness * displacement - friction * velocity
    }
}

// =============================================================================
// SCALAR
// =============================================================================

/// Animated scalar (node side length, entry scale, camera zoom)
#[derive(Debug, Clone)]
pub struct SpringF32 {
    value: f32,
    target: f32,
    velocity: f32,
    config: SpringConfig,
}

impl SpringF32 {
    pub fn new(initial: f32) -> Self {
        Self::with_config(initial, SpringConfig::default())
    }

    pub fn with_config(initial: f32, config: SpringConfig) -> Self {
        Self {
            value: initial,
            target: initial,
            velocity: 0.0,
            config,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jump to `value` and stop.
    pub fn set_immediate(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Semi-implicit Euler step, snapping to rest when close enough.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_SPRING_DT);
        let accel = self.config.acceleration(self.value - self.target, self.velocity);
        self.velocity += accel * dt;
        self.value += self.velocity * dt;

        if !self.is_animating() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        (self.value - self.target).abs() > REST_DISTANCE || self.velocity.abs() > REST_SPEED
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }
}

// =============================================================================
// POINT
// =============================================================================

/// Animated point (camera center)
#[derive(Debug, Clone)]
pub struct SpringVec2 {
    value: Pos2,
    target: Pos2,
    velocity: Vec2,
    config: SpringConfig,
}

impl SpringVec2 {
    pub fn with_config(initial: Pos2, config: SpringConfig) -> Self {
        Self {
            value: initial,
            target: initial,
            velocity: Vec2::ZERO,
            config,
        }
    }

    pub fn set_target(&mut self, target: Pos2) {
        self.target = target;
    }

    pub fn target(&self) -> Pos2 {
        self.target
    }

    pub fn set_immediate(&mut self, value: Pos2) {
        self.value = value;
        self.target = value;
        self.velocity = Vec2::ZERO;
    }

    pub fn tick(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_SPRING_DT);
        let offset = self.value - self.target;
        let accel = Vec2::new(
            self.config.acceleration(offset.x, self.velocity.x),
            self.config.acceleration(offset.y, self.velocity.y),
        );
        self.velocity += accel * dt;
        self.value += self.velocity * dt;

        if !self.is_animating() {
            self.value = self.target;
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn get(&self) -> Pos2 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        let offset = self.value - self.target;
        offset.x.abs().max(offset.y.abs()) > REST_DISTANCE
            || self.velocity.x.abs().max(self.velocity.y.abs()) > REST_SPEED
    }
}
