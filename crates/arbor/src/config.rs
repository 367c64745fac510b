//! Tunables for the layout pipeline.
//!
//! Defaults are the iteration caps the layout has always shipped with; they are exposed so hosts
//! with very large trees can trade quality for time.

use serde::{Deserialize, Serialize};

/// How [`LayoutEngine`](crate::LayoutEngine) schedules the pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionMode {
    /// A dedicated worker thread runs every step to completion.
    #[default]
    Background,
    /// Steps are queued; the host runs them one at a time via `LayoutEngine::step`.
    Incremental,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub max_consistency_passes: usize,
    pub max_layering_passes: usize,
    pub max_sweeps: usize,
    /// Consecutive non-improving sweeps tolerated before a minimization phase stops.
    pub sweep_patience: usize,
    pub epsilon: f64,
    pub mode: ExecutionMode,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_consistency_passes: 10,
            max_layering_passes: 50,
            max_sweeps: 50,
            sweep_patience: 2,
            epsilon: 1e-4,
            mode: ExecutionMode::Background,
        }
    }
}

impl LayoutOptions {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
