#![forbid(unsafe_code)]

//! Editor configuration as data.
//!
//! [`EditorConfig`] groups every tunable of the editor (grid dimensions, hold
//! timing, animation speeds, and the fallback selection) into one struct that
//! can be loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! drag_speed = "fast"
//! structural_speed = { custom_ms = 240 }
//!
//! [layout]
//! width = 390.0
//! line_size = 4
//!
//! [hold]
//! hold_delay_ms = 250
//! ```
//!
//! ```rust,ignore
//! let config = EditorConfig::from_toml_file("tilegrid.toml")?;
//! ```
//!
//! # Defaults
//!
//! `EditorConfig::default()` is a 375 px wide grid with 4 cells per line,
//! 50 px cells and 50 px section headers, a 200 ms hold delay, and normal
//! animation speed everywhere.

#[cfg(feature = "config-files")]
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tilegrid_core::animation::AnimationSpeed;
use tilegrid_core::gesture::HoldConfig;
use tilegrid_core::item::Item;
use tilegrid_layout::SectionMetrics;

// ---------------------------------------------------------------------------
// Top-level EditorConfig
// ---------------------------------------------------------------------------

/// Every tunable of the grid editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid and header dimensions.
    pub layout: LayoutConfig,

    /// Hold-to-drag timing and emphasis.
    pub hold: HoldPolicyConfig,

    /// Speed of the cells shifted aside during a drag.
    pub drag_speed: SpeedConfig,

    /// Speed of add and remove animations.
    pub structural_speed: SpeedConfig,

    /// Selection used when nothing was persisted yet.
    pub default_selection: Vec<Item>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            hold: HoldPolicyConfig::default(),
            drag_speed: SpeedConfig::Normal,
            structural_speed: SpeedConfig::Normal,
            default_selection: vec![Item::new(0, "Featured")],
        }
    }
}

impl EditorConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.layout.line_size == 0 {
            errors.push("layout.line_size must be > 0".into());
        }
        if !(self.layout.width.is_finite() && self.layout.width > 0.0) {
            errors.push(format!("layout.width must be > 0, got {}", self.layout.width));
        }
        if !(self.layout.cell_height.is_finite() && self.layout.cell_height > 0.0) {
            errors.push(format!(
                "layout.cell_height must be > 0, got {}",
                self.layout.cell_height
            ));
        }
        if !(self.layout.header_height.is_finite() && self.layout.header_height >= 0.0) {
            errors.push(format!(
                "layout.header_height must be >= 0, got {}",
                self.layout.header_height
            ));
        }

        if self.hold.hold_delay_ms == 0 {
            errors.push("hold.hold_delay_ms must be > 0".into());
        }
        if !(self.hold.active_opacity >= 0.0 && self.hold.active_opacity <= 1.0) {
            errors.push(format!(
                "hold.active_opacity must be in [0, 1], got {}",
                self.hold.active_opacity
            ));
        }
        if !(self.hold.active_scale.is_finite() && self.hold.active_scale > 0.0) {
            errors.push(format!(
                "hold.active_scale must be > 0, got {}",
                self.hold.active_scale
            ));
        }

        for (name, speed) in [
            ("drag_speed", self.drag_speed),
            ("structural_speed", self.structural_speed),
        ] {
            if speed == SpeedConfig::CustomMs(0) {
                errors.push(format!("{name}.custom_ms must be > 0"));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for item in &self.default_selection {
            if !seen.insert(item.id) {
                errors.push(format!("default_selection has duplicate id {}", item.id));
            }
        }

        errors
    }

    /// Load and validate in one step.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str_validated(s: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Section metrics derived from [`layout`](Self::layout).
    #[must_use]
    pub fn metrics(&self) -> SectionMetrics {
        self.layout.to_metrics()
    }

    /// Gesture configuration derived from [`hold`](Self::hold).
    #[must_use]
    pub fn hold_config(&self) -> HoldConfig {
        self.hold.to_hold_config()
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Grid and header dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Total width shared by one row of cells.
    pub width: f64,
    /// Cells per row.
    pub line_size: usize,
    pub cell_height: f64,
    /// Height of each of the two section headers.
    pub header_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            line_size: 4,
            cell_height: 50.0,
            header_height: 50.0,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn to_metrics(&self) -> SectionMetrics {
        SectionMetrics::for_width(self.width, self.line_size, self.cell_height, self.header_height)
    }
}

/// Hold-to-drag parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldPolicyConfig {
    /// Press duration that turns a press into a drag, in milliseconds.
    pub hold_delay_ms: u64,
    pub active_scale: f64,
    pub active_opacity: f64,
    pub base_z_index: i32,
}

impl Default for HoldPolicyConfig {
    fn default() -> Self {
        let d = HoldConfig::default();
        Self {
            hold_delay_ms: d.hold_delay.as_millis() as u64,
            active_scale: d.active_scale,
            active_opacity: d.active_opacity,
            base_z_index: d.base_z_index,
        }
    }
}

impl HoldPolicyConfig {
    #[must_use]
    pub fn to_hold_config(&self) -> HoldConfig {
        HoldConfig {
            hold_delay: Duration::from_millis(self.hold_delay_ms),
            active_scale: self.active_scale,
            active_opacity: self.active_opacity,
            base_z_index: self.base_z_index,
        }
    }
}

/// Serializable form of [`AnimationSpeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedConfig {
    Fast,
    #[default]
    Normal,
    Slow,
    /// Whole animation spread over this many milliseconds.
    CustomMs(u64),
}

impl SpeedConfig {
    #[must_use]
    pub fn to_speed(self) -> AnimationSpeed {
        match self {
            Self::Fast => AnimationSpeed::Fast,
            Self::Normal => AnimationSpeed::Normal,
            Self::Slow => AnimationSpeed::Slow,
            Self::CustomMs(ms) => AnimationSpeed::Custom(Duration::from_millis(ms)),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading or validating an [`EditorConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(EditorConfig::default().validate().is_empty());
    }

    #[test]
    fn defaults_match_gesture_and_layout_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.hold_config(), HoldConfig::default());
        assert_eq!(config.metrics(), SectionMetrics::default());
        assert_eq!(config.drag_speed.to_speed(), AnimationSpeed::Normal);
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut config = EditorConfig::default();
        config.layout.line_size = 0;
        config.hold.active_opacity = 1.5;
        config.structural_speed = SpeedConfig::CustomMs(0);
        config.default_selection = vec![Item::new(0, "a"), Item::new(0, "b")];
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("line_size")));
        assert!(errors.iter().any(|e| e.contains("structural_speed")));
    }

    #[test]
    fn custom_speed_converts_to_duration() {
        assert_eq!(
            SpeedConfig::CustomMs(300).to_speed(),
            AnimationSpeed::Custom(Duration::from_millis(300))
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"layout":{"line_size":3},"drag_speed":"slow"}"#).unwrap();
        assert_eq!(config.layout.line_size, 3);
        assert_eq!(config.layout.cell_height, 50.0);
        assert_eq!(config.drag_speed, SpeedConfig::Slow);
        assert_eq!(config.hold, HoldPolicyConfig::default());
    }

    #[test]
    fn validation_error_display_joins_messages() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }
}
