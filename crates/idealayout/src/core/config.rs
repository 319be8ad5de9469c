//! Layout configuration
//!
//! Spacing, fallback sizes and the incremental threshold are plain
//! values passed into the engine, so two engines with different spacing
//! can run side by side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{LayoutError, Result};

/// What the ranker does when Kahn's algorithm stalls on a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleFallback {
    /// Discard the partial order and rank the nodes in input order
    #[default]
    InputOrder,
    /// Keep the partial order and append the stalled nodes in input order
    AppendUnordered,
}

impl CycleFallback {
    /// Get all valid policy names
    pub fn variants() -> &'static [&'static str] {
        &["input-order", "append-unordered"]
    }
}

impl FromStr for CycleFallback {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input-order" => Ok(CycleFallback::InputOrder),
            "append-unordered" => Ok(CycleFallback::AppendUnordered),
            _ => Err(format!("Unknown cycle fallback: {}", s)),
        }
    }
}

impl fmt::Display for CycleFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleFallback::InputOrder => write!(f, "input-order"),
            CycleFallback::AppendUnordered => write!(f, "append-unordered"),
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between the widest node of a column and the next column
    pub column_gap: f64,
    /// Vertical gap between nodes stacked in one column
    pub row_gap: f64,
    /// Width used for nodes without a width hint; also the minimum column width
    pub default_width: f64,
    /// Height used for nodes without a height hint
    pub default_height: f64,
    /// Graphs with at most this many nodes always get a full relayout
    pub incremental_threshold: usize,
    pub cycle_fallback: CycleFallback,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_gap: 160.0,
            row_gap: 40.0,
            default_width: 320.0,
            default_height: 120.0,
            incremental_threshold: 300,
            cycle_fallback: CycleFallback::InputOrder,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column_gap(mut self, column_gap: f64) -> Self {
        self.column_gap = column_gap;
        self
    }

    pub fn with_row_gap(mut self, row_gap: f64) -> Self {
        self.row_gap = row_gap;
        self
    }

    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    pub fn with_incremental_threshold(mut self, threshold: usize) -> Self {
        self.incremental_threshold = threshold;
        self
    }

    pub fn with_cycle_fallback(mut self, fallback: CycleFallback) -> Self {
        self.cycle_fallback = fallback;
        self
    }

    /// Reject spacing and sizes that would produce overlapping or
    /// non-finite coordinates
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("column_gap", self.column_gap),
            ("row_gap", self.row_gap),
            ("default_width", self.default_width),
            ("default_height", self.default_height),
        ];
        for (field, value) in checks {
            if !value.is_finite() {
                return Err(LayoutError::invalid_config(field, "must be finite"));
            }
            if value < 0.0 {
                return Err(LayoutError::invalid_config(
                    field,
                    format!("must not be negative, got {}", value),
                ));
            }
        }
        Ok(())
    }
}
