//! Tunable interaction and layout parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Canvas behaviour knobs.
///
/// Every field has a default, so a partial JSON file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Padding (world units) added around bounds for point hit-testing.
    pub hit_padding: f64,
    /// Resize handle size in screen pixels.
    pub handle_size: f64,
    /// Multiplicative zoom step applied per wheel notch.
    pub zoom_step: f64,
    /// Box shapes with a smaller area are discarded on commit.
    pub min_shape_area: f64,
    /// Lines and arrows shorter than this are discarded on commit.
    pub min_line_length: f64,
    /// Freehand paths shorter than this are discarded on commit.
    pub min_path_length: f64,
    /// Maximum number of snapshots kept by the history.
    pub history_limit: usize,
    /// Grid spacing in world units.
    pub grid_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            hit_padding: 10.0,
            handle_size: 10.0,
            zoom_step: 1.1,
            min_shape_area: 4.0,
            min_line_length: 2.0,
            min_path_length: 1.0,
            history_limit: 200,
            grid_size: 50.0,
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a configuration file, falling back to the defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Wheel zoom factor for a vertical scroll delta (negative = zoom in).
    pub fn wheel_factor(&self, delta_y: f64) -> f64 {
        if delta_y < 0.0 {
            self.zoom_step
        } else if delta_y > 0.0 {
            1.0 / self.zoom_step
        } else {
            1.0
        }
    }
}
