//! Editor configuration.

use crate::canvas::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::geometry::{GUIDE_THRESHOLD, MIN_SIZE, SNAP_UNIT};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::storage::{DEFAULT_AUTOSAVE_INTERVAL_SECS, DESIGN_KEY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;
pub const DEFAULT_MAX_ZOOM: f64 = 2.0;

/// Tunables for an editing session.
///
/// Every field has a default, so a config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Size of a fresh canvas.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Grid unit for drag and resize.
    pub snap_unit: f64,
    /// Alignment guide threshold in canvas units.
    pub guide_threshold: f64,
    /// Number of undo snapshots kept.
    pub history_capacity: usize,
    pub autosave_interval_secs: u64,
    /// Storage key the working design is saved under.
    pub design_key: String,
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            snap_unit: SNAP_UNIT,
            guide_threshold: GUIDE_THRESHOLD,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            design_key: DESIGN_KEY.to_string(),
            zoom_step: DEFAULT_ZOOM_STEP,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl EditorConfig {
    /// Parse a config document. Out-of-range values are repaired, see
    /// [`normalized`](Self::normalized).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: EditorConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Replace values the editor cannot work with by their defaults.
    ///
    /// Sizes, steps and zoom bounds must be finite and positive, and the zoom
    /// bounds are put in order.
    pub fn normalized(mut self) -> Self {
        let defaults = EditorConfig::default();

        repair(&mut self.canvas_width, defaults.canvas_width, "canvas_width", |v| v >= MIN_SIZE);
        repair(&mut self.canvas_height, defaults.canvas_height, "canvas_height", |v| v >= MIN_SIZE);
        repair(&mut self.snap_unit, defaults.snap_unit, "snap_unit", |v| v > 0.0);
        repair(&mut self.guide_threshold, defaults.guide_threshold, "guide_threshold", |v| v >= 0.0);
        repair(&mut self.zoom_step, defaults.zoom_step, "zoom_step", |v| v > 0.0);
        repair(&mut self.min_zoom, defaults.min_zoom, "min_zoom", |v| v > 0.0);
        repair(&mut self.max_zoom, defaults.max_zoom, "max_zoom", |v| v > 0.0);

        if self.min_zoom > self.max_zoom {
            log::warn!("min_zoom {} exceeds max_zoom {}, swapping", self.min_zoom, self.max_zoom);
            std::mem::swap(&mut self.min_zoom, &mut self.max_zoom);
        }
        if self.design_key.trim().is_empty() {
            log::warn!("Empty design_key, using '{}'", defaults.design_key);
            self.design_key = defaults.design_key;
        }
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}

fn repair(value: &mut f64, default: f64, name: &str, valid: impl Fn(f64) -> bool) {
    if !value.is_finite() || !valid(*value) {
        log::warn!("Invalid {} {}, using {}", name, value, default);
        *value = default;
    }
}
