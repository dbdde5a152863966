use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::chart::DEFAULT_MAX_PIE_CATEGORIES;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "DATA_SWEEPER_CONFIG";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Tunables read once at start-up. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rows shown in the preview table.
    pub preview_rows: usize,
    /// Pie charts with more distinct x values are refused.
    pub pie_max_categories: usize,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            pie_max_categories: DEFAULT_MAX_PIE_CATEGORIES,
            window_size: [1200.0, 800.0],
        }
    }
}

impl AppConfig {
    /// Load from the file named by `DATA_SWEEPER_CONFIG`, or defaults when
    /// the variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid config JSON")
    }
}
