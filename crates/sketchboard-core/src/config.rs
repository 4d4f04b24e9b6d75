//! Canvas configuration.

use crate::camera::{MAX_SCALE, MIN_SCALE};
use crate::selection::{HandleMetrics, HANDLE_SIZE, LINE_HIT_TOLERANCE, SELECTION_PADDING};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for canvas interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Minimum zoom factor.
    pub min_scale: f64,
    /// Maximum zoom factor.
    pub max_scale: f64,
    /// Scale change per unit of wheel delta.
    pub zoom_sensitivity: f64,
    /// Resize handle side in screen pixels.
    pub handle_size: f64,
    /// Gap between a shape and its selection outline.
    pub selection_padding: f64,
    /// Line body hit distance.
    pub line_hit_tolerance: f64,
    /// Tool selected when the session starts.
    pub initial_tool: ToolKind,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_sensitivity: 0.001,
            handle_size: HANDLE_SIZE,
            selection_padding: SELECTION_PADDING,
            line_hit_tolerance: LINE_HIT_TOLERANCE,
            initial_tool: ToolKind::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded canvas config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid(format!(
                "min_scale {} exceeds max_scale {}",
                self.min_scale, self.max_scale
            )));
        }
        for (name, value) in [
            ("handle_size", self.handle_size),
            ("line_hit_tolerance", self.line_hit_tolerance),
            ("zoom_sensitivity", self.zoom_sensitivity),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.selection_padding >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "selection_padding must not be negative, got {}",
                self.selection_padding
            )));
        }
        Ok(())
    }

    /// Handle sizing derived from this config.
    pub fn handle_metrics(&self) -> HandleMetrics {
        HandleMetrics {
            size: self.handle_size,
            padding: self.selection_padding,
        }
    }
}
