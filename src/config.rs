//! Mind map configuration.
//!
//! All values have defaults matching the reference canvas (172×36 nodes,
//! 50px sibling gap, 100px rank gap, 500ms simulated save). Environment
//! variables override them:
//!
//! - `MINDMAP_LAYOUT_DIRECTION`: `LR` or `TB` (default: `LR`)
//! - `MINDMAP_SAVE_DELAY_MS`: simulated save latency (default: 500)
//! - `MINDMAP_PLACEHOLDER_LABEL`: label of freshly added nodes (default: `New Topic`)

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::layout::LayoutDirection;
use crate::PLACEHOLDER_LABEL;

/// Geometry fed to the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Flow direction.
    pub direction: LayoutDirection,
    /// Fixed node width.
    pub node_width: f64,
    /// Fixed node height.
    pub node_height: f64,
    /// Gap between neighbouring nodes in the same rank.
    pub node_sep: f64,
    /// Gap between ranks.
    pub rank_sep: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::LeftRight,
            node_width: 172.0,
            node_height: 36.0,
            node_sep: 50.0,
            rank_sep: 100.0,
        }
    }
}

/// Approximate placement of nodes created between layout passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Horizontal distance from the parent.
    pub x_offset: f64,
    /// Vertical distance between siblings.
    pub y_offset: f64,
    /// Label given to freshly added nodes.
    pub placeholder_label: String,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            x_offset: 200.0,
            y_offset: 75.0,
            placeholder_label: PLACEHOLDER_LABEL.to_string(),
        }
    }
}

/// Top-level configuration for a mind map session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindMapConfig {
    /// Layout geometry.
    pub layout: LayoutConfig,
    /// Placement heuristic for new nodes.
    pub placement: PlacementConfig,
    /// Latency of the simulated save backend.
    pub save_delay_ms: u64,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            placement: PlacementConfig::default(),
            save_delay_ms: 500,
        }
    }
}

impl MindMapConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Invalid values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("MINDMAP_LAYOUT_DIRECTION") {
            match LayoutDirection::from_str(&raw) {
                Some(direction) => config.layout.direction = direction,
                None => tracing::warn!(
                    value = %raw,
                    "MINDMAP_LAYOUT_DIRECTION must be LR or TB, using default"
                ),
            }
        }

        if let Some(raw) = lookup("MINDMAP_SAVE_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.save_delay_ms = ms,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "MINDMAP_SAVE_DELAY_MS is not a number, using default"
                ),
            }
        }

        if let Some(raw) = lookup("MINDMAP_PLACEHOLDER_LABEL") {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                tracing::warn!("MINDMAP_PLACEHOLDER_LABEL is empty, using default");
            } else {
                config.placement.placeholder_label = trimmed.to_string();
            }
        }

        config
    }

    /// Simulated save latency as a `Duration`.
    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }
}
