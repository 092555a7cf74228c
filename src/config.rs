//! Aggregation settings.
//!
//! Both knobs default to the behavior of the dataset's reference viewer, so
//! that color scales built from the same CSV come out identical. The
//! alternatives are opt-in.

use serde::{Deserialize, Serialize};

/// How the per-metric running "minimum" is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MinimumTracking {
    /// Updated with `max(previous, value)`, exactly like the maximum.
    #[default]
    Legacy,
    /// A real running minimum, seeded from the first value written.
    True,
}

/// How repeated `AvgProcessingTime` contributions for one cell combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Averaging {
    /// `floor((stored + new) / 2)`: only the latest two values ever meet.
    #[default]
    Pairwise,
    /// `floor(sum / count)` over every contribution to the cell.
    RunningMean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub minimum_tracking: MinimumTracking,
    #[serde(default)]
    pub averaging: Averaging,
}

impl AggregationConfig {
    /// Reads `CITMAP_MINIMUM_TRACKING` and `CITMAP_AVERAGING`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup("CITMAP_MINIMUM_TRACKING") {
            match v.trim().to_ascii_lowercase().as_str() {
                "legacy" => cfg.minimum_tracking = MinimumTracking::Legacy,
                "true" => cfg.minimum_tracking = MinimumTracking::True,
                other => tracing::warn!(value = other, "unrecognized CITMAP_MINIMUM_TRACKING, using legacy"),
            }
        }
        if let Some(v) = lookup("CITMAP_AVERAGING") {
            match v.trim().to_ascii_lowercase().as_str() {
                "pairwise" => cfg.averaging = Averaging::Pairwise,
                "running-mean" => cfg.averaging = Averaging::RunningMean,
                other => tracing::warn!(value = other, "unrecognized CITMAP_AVERAGING, using pairwise"),
            }
        }
        cfg
    }
}
