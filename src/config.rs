use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::canvas::CanvasLayout;
use crate::error::{EditorError, Result};
use crate::geometry::Color;

pub const CONFIG_ENV: &str = "PIXEL_STUDIO_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "pixel_studio.json";

const PALETTE: [Color; 8] = [
    Color::rgb(0, 0, 0),       // Black
    Color::rgb(255, 0, 0),     // Red
    Color::rgb(0, 128, 255),   // Blue-ish
    Color::rgb(0, 180, 0),     // Green
    Color::rgb(255, 200, 0),   // Orange
    Color::rgb(255, 255, 0),   // Yellow
    Color::rgb(255, 0, 255),   // Magenta
    Color::rgb(255, 255, 255), // White
];

/// User-tunable editor settings. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub title: String,
    pub window_size: [u32; 2],
    pub canvas_layout: CanvasLayout,
    pub history_capacity: usize,
    pub scroll_step: f32,
    pub canvas_background: Color,
    pub workspace_color: Color,
    pub brush_color: Color,
    pub brush_radius: f32,
    pub brush_radius_min: f32,
    pub brush_radius_max: f32,
    pub palette: Vec<Color>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: "Pixel Studio".to_string(),
            window_size: [1024, 720],
            canvas_layout: CanvasLayout::default(),
            history_capacity: crate::history::DEFAULT_CAPACITY,
            scroll_step: 0.05,
            canvas_background: Color::WHITE,
            workspace_color: Color::rgb(236, 236, 236),
            brush_color: Color::BLACK,
            brush_radius: 6.0,
            brush_radius_min: 1.0,
            brush_radius_max: 64.0,
            palette: PALETTE.to_vec(),
        }
    }
}

impl EditorConfig {
    /// Config file location: `$PIXEL_STUDIO_CONFIG`, else `pixel_studio.json`
    /// in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("config: {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(EditorError::io(path, e)),
        };
        let config = Self::from_json(&text)?;
        info!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Like [`EditorConfig::load`], but reports errors and falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("config: {}; using defaults", e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| EditorError::io(path, e))
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.canvas_layout;
        let fractions = [layout.x, layout.y, layout.width, layout.height];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f))
            || layout.x + layout.width > 1.0
            || layout.y + layout.height > 1.0
        {
            return Err(EditorError::Config(format!("canvas_layout out of range: {:?}", layout)));
        }
        if self.history_capacity == 0 {
            return Err(EditorError::Config("history_capacity must be at least 1".to_string()));
        }
        if !(self.scroll_step > 0.0 && self.scroll_step <= 1.0) {
            return Err(EditorError::Config(format!("scroll_step {} not in (0, 1]", self.scroll_step)));
        }
        if !(self.brush_radius_min > 0.0 && self.brush_radius_min <= self.brush_radius_max) {
            return Err(EditorError::Config(format!(
                "brush radius range {}..{} is empty",
                self.brush_radius_min, self.brush_radius_max
            )));
        }
        if self.window_size[0] == 0 || self.window_size[1] == 0 {
            return Err(EditorError::Config("window_size must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Initial brush radius, clamped into the configured range.
    pub fn initial_radius(&self) -> f32 {
        self.brush_radius.clamp(self.brush_radius_min, self.brush_radius_max)
    }
}
