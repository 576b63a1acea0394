//! Board configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default number of grid rows.
pub const DEFAULT_ROWS: usize = 20;
/// Default number of grid columns.
pub const DEFAULT_COLS: usize = 30;
/// Default cell size in SVG-space pixels.
pub const DEFAULT_CELL_SIZE: f64 = 30.0;
/// Maximum number of undo snapshots kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;
/// Feet represented by one grid square.
pub const FEET_PER_SQUARE: f64 = 5.0;

/// Tunables for a board session.
///
/// Every field has a default so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    /// Size of one cell in SVG-space pixels.
    pub cell_size: f64,
    pub history_depth: usize,
    pub feet_per_square: f64,
    /// Maximum delay between two clicks on the same text object.
    pub double_click_ms: u64,
    /// Squared pixel movement before a shape press turns into a drag.
    pub drag_threshold_sq: f64,
    /// Line hit tolerance in SVG pixels, independent of zoom.
    pub line_hit_tolerance: f64,
    pub zoom_factor: f64,
    /// Viewport width may not exceed `content_width * max_zoom_out`.
    pub max_zoom_out: f64,
    /// Viewport width may not drop below `content_width / max_zoom_in`.
    pub max_zoom_in: f64,
    pub text_min_width: f64,
    pub text_padding_x: f64,
    pub text_padding_y: f64,
    pub default_font_size: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_size: DEFAULT_CELL_SIZE,
            history_depth: DEFAULT_HISTORY_DEPTH,
            feet_per_square: FEET_PER_SQUARE,
            double_click_ms: 300,
            drag_threshold_sq: 25.0,
            line_hit_tolerance: 8.0,
            zoom_factor: 1.1,
            max_zoom_out: 3.0,
            max_zoom_in: 20.0,
            text_min_width: 150.0,
            text_padding_x: 8.0,
            text_padding_y: 4.0,
            default_font_size: 16.0,
        }
    }
}

impl BoardConfig {
    /// Create a config with the given grid dimensions and defaults elsewhere.
    pub fn with_grid(rows: usize, cols: usize, cell_size: f64) -> Self {
        Self {
            rows,
            cols,
            cell_size,
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the grid and tunables are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid("history depth must be at least 1".to_string()));
        }
        if self.zoom_factor.is_nan() || self.zoom_factor <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom factor must be greater than 1, got {}",
                self.zoom_factor
            )));
        }
        Ok(())
    }

    /// Width of the grid content in SVG pixels.
    pub fn content_width(&self) -> f64 {
        self.cols as f64 * self.cell_size
    }

    /// Height of the grid content in SVG pixels.
    pub fn content_height(&self) -> f64 {
        self.rows as f64 * self.cell_size
    }
}
