use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for a graph session. Defaults match the interactive app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Quiet period (ms) before a coalesced history commit or redraw fires.
    pub quiet_period_ms: u64,
    /// Maximum number of undo steps kept per graph.
    pub history_capacity: usize,
    /// Number of samples along an equation line (inclusive of both ends).
    pub line_samples: usize,
    /// Nodes per side of an equation or parametric surface grid.
    pub surface_grid: usize,
    /// Discrete steps across a filter slider's data range.
    pub slider_steps: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 300,
            history_capacity: 25,
            line_samples: 101,
            surface_grid: 30,
            slider_steps: 200,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
