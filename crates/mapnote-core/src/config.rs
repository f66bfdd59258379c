//! Editor-wide configuration.

use serde::{Deserialize, Serialize};

/// Grid size for snapping (matches the visual grid).
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Maximum number of undo entries to keep.
pub const DEFAULT_MAX_UNDO_STEPS: usize = 50;

/// Maximum number of snapshots kept per project.
pub const DEFAULT_MAX_VERSIONS: usize = 20;

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Configuration shared by every component of an editing session.
///
/// All fields have defaults, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Grid spacing used by snapping.
    pub grid_size: f64,
    /// Whether tool input snaps to the grid.
    pub snap_to_grid: bool,
    /// Undo stack capacity; oldest entries are evicted first.
    pub max_undo_steps: usize,
    /// Snapshot ring buffer capacity per project.
    pub max_versions: usize,
    /// Seconds between automatic snapshots.
    pub autosave_interval_secs: u64,
    /// Minimum width/height/radius/length a drawn gesture needs to be kept.
    pub min_element_size: f64,
    /// Extra slack when hit-testing strokes (lines, measurements).
    pub hit_tolerance: f64,
    /// Number of outer points generated by the star tool.
    pub star_points: usize,
    /// Inner radius of a star as a fraction of its outer radius.
    pub star_inner_ratio: f64,
    /// Font size for new text elements.
    pub default_font_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: true,
            max_undo_steps: DEFAULT_MAX_UNDO_STEPS,
            max_versions: DEFAULT_MAX_VERSIONS,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            min_element_size: 5.0,
            hit_tolerance: 4.0,
            star_points: 5,
            star_inner_ratio: 0.5,
            default_font_size: 16.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Configuration with grid snapping turned off.
    pub fn without_snapping(mut self) -> Self {
        self.snap_to_grid = false;
        self
    }
}
