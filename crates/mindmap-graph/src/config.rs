//! Graph settings loaded from `config/graph_settings.yaml`.
//!
//! The bundled file is compiled in and parsed once by [`global_config()`].
//! A host can load a replacement with [`GraphSettings::load`] and hand it to
//! the surface directly.

use crate::error::ConfigError;
use crate::graph::exploration::DisclosurePolicy;
use crate::graph::force_sim::ForceConfig;
use mindmap_input::GestureConfig;
use mindmap_types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

const BUNDLED_SETTINGS: &str = include_str!("../config/graph_settings.yaml");

static GLOBAL: OnceLock<GraphSettings> = OnceLock::new();

/// Settings parsed from the bundled YAML, or built-in defaults if that fails.
pub fn global_config() -> &'static GraphSettings {
    GLOBAL.get_or_init(|| match GraphSettings::from_yaml_str(BUNDLED_SETTINGS) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Bundled graph settings rejected, using defaults: {}", e);
            GraphSettings::default()
        }
    })
}

// =============================================================================
// TOP LEVEL
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub layout: LayoutSettings,
    pub nodes: NodeSettings,
    pub gestures: GestureConfig,
    pub camera: CameraSettings,
    pub animation: AnimationSettings,
    pub exploration: ExplorationSettings,
}

impl GraphSettings {
    /// Parse and validate settings from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: GraphSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&text)?;
        tracing::info!("Loaded graph settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gestures.validate()?;

        let cam = &self.camera;
        if !(cam.min_zoom > 0.0 && cam.min_zoom <= cam.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "camera zoom range [{}, {}] is empty or non-positive",
                cam.min_zoom, cam.max_zoom
            )));
        }

        for (name, preset) in [
            ("regular", &self.layout.regular),
            ("compact", &self.layout.compact),
        ] {
            if !(preset.alpha_decay > 0.0 && preset.alpha_decay < 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "layout.{name}.alpha_decay must be in (0, 1)"
                )));
            }
            // Alpha decays toward zero without reaching it, so a zero floor never settles.
            if !(preset.alpha_min > 0.0 && preset.alpha_min < preset.reheat_alpha_target) {
                return Err(ConfigError::Invalid(format!(
                    "layout.{name}.alpha_min must be in (0, reheat_alpha_target)"
                )));
            }
            if !(0.0..=1.0).contains(&preset.velocity_decay) {
                return Err(ConfigError::Invalid(format!(
                    "layout.{name}.velocity_decay must be in [0, 1]"
                )));
            }
            if preset.link_distance <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "layout.{name}.link_distance must be positive"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// PER-CATEGORY VALUES
// =============================================================================

/// One value per node category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetric {
    pub root: f32,
    pub main: f32,
    pub sub: f32,
    pub detail: f32,
}

impl CategoryMetric {
    pub const fn new(root: f32, main: f32, sub: f32, detail: f32) -> Self {
        Self {
            root,
            main,
            sub,
            detail,
        }
    }

    pub fn get(&self, category: Category) -> f32 {
        match category {
            Category::Root => self.root,
            Category::Main => self.main,
            Category::Sub => self.sub,
            Category::Detail => self.detail,
        }
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Viewports at or below this width use `compact`.
    pub compact_breakpoint: f32,
    pub regular: ForceConfig,
    pub compact: ForceConfig,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            compact_breakpoint: 768.0,
            regular: ForceConfig::regular(),
            compact: ForceConfig::compact(),
        }
    }
}

impl LayoutSettings {
    pub fn is_compact(&self, width: f32) -> bool {
        width <= self.compact_breakpoint
    }

    pub fn preset_for_width(&self, width: f32) -> &ForceConfig {
        if self.is_compact(width) {
            &self.compact
        } else {
            &self.regular
        }
    }
}

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    pub size: CategoryMetric,
    pub hover_size: CategoryMetric,
    pub compact_size: CategoryMetric,
    pub compact_hover_size: CategoryMetric,
    pub compact_label_chars: usize,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            size: CategoryMetric::new(80.0, 60.0, 40.0, 40.0),
            hover_size: CategoryMetric::new(90.0, 70.0, 50.0, 50.0),
            compact_size: CategoryMetric::new(70.0, 55.0, 40.0, 40.0),
            compact_hover_size: CategoryMetric::new(80.0, 65.0, 50.0, 50.0),
            compact_label_chars: 8,
        }
    }
}

impl NodeSettings {
    pub fn side(&self, category: Category, compact: bool, hovered: bool) -> f32 {
        let metric = match (compact, hovered) {
            (false, false) => &self.size,
            (false, true) => &self.hover_size,
            (true, false) => &self.compact_size,
            (true, true) => &self.compact_hover_size,
        };
        metric.get(category)
    }

    /// Compact labels keep `limit - 2` chars and append "...".
    pub fn label<'a>(&self, name: &'a str, compact: bool) -> std::borrow::Cow<'a, str> {
        let limit = self.compact_label_chars;
        if !compact || name.chars().count() <= limit {
            return std::borrow::Cow::Borrowed(name);
        }
        let kept: String = name.chars().take(limit.saturating_sub(2)).collect();
        std::borrow::Cow::Owned(format!("{kept}..."))
    }
}

// =============================================================================
// CAMERA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub compact_initial_zoom: f32,
    pub compact_zoom_min_nodes: usize,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_zoom: 0.3,
            max_zoom: 4.0,
            compact_initial_zoom: 0.7,
            compact_zoom_min_nodes: 5,
        }
    }
}

// =============================================================================
// ANIMATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfigYaml {
    pub stiffness: f32,
    pub damping: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub springs: BTreeMap<String, SpringConfigYaml>,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        let springs = [
            ("fast", 300.0, 1.0),
            ("medium", 170.0, 1.0),
            ("slow", 80.0, 1.0),
            ("bouncy", 220.0, 0.5),
        ]
        .into_iter()
        .map(|(name, stiffness, damping)| {
            (name.to_string(), SpringConfigYaml { stiffness, damping })
        })
        .collect();
        Self { springs }
    }
}

impl AnimationSettings {
    /// Named preset, falling back to `medium`, then to a hardcoded spring.
    pub fn spring(&self, name: &str) -> SpringConfigYaml {
        self.springs
            .get(name)
            .or_else(|| self.springs.get("medium"))
            .copied()
            .unwrap_or(SpringConfigYaml {
                stiffness: 170.0,
                damping: 1.0,
            })
    }
}

// =============================================================================
// EXPLORATION
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationSettings {
    pub initial_disclosure: DisclosurePolicy,
}
