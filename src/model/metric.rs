use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// One of the seven numeric fields tracked per region and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Metric {
    Queued,
    Dequeued,
    Granted,
    Refused,
    Canceled,
    Pending,
    /// Averaged duration in days.
    AvgProcessingTime,
}

/// How a second contribution for the same (year, alpha3) cell combines with the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    Sum,
    FlooredMean,
}

impl Metric {
    pub const COUNT: usize = 7;

    /// Column order of the source dataset.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Queued,
        Metric::Dequeued,
        Metric::Granted,
        Metric::Refused,
        Metric::Canceled,
        Metric::Pending,
        Metric::AvgProcessingTime,
    ];

    /// Field name as it appears in the dataset header.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Queued => "Queued",
            Metric::Dequeued => "Dequeued",
            Metric::Granted => "Granted",
            Metric::Refused => "Refused",
            Metric::Canceled => "Canceled",
            Metric::Pending => "Pending",
            Metric::AvgProcessingTime => "AvgProcessingTime",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn merge_rule(self) -> MergeRule {
        match self {
            Metric::AvgProcessingTime => MergeRule::FlooredMean,
            Metric::Queued
            | Metric::Dequeued
            | Metric::Granted
            | Metric::Refused
            | Metric::Canceled
            | Metric::Pending => MergeRule::Sum,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}
