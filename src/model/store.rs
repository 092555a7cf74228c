use std::collections::BTreeMap;

use crate::config::{AggregationConfig, Averaging, MinimumTracking};
use crate::io::rows::DecodedRow;
use crate::model::dataset::Dataset;
use crate::model::metric::{MergeRule, Metric};
use crate::model::region::RegionAttrs;

/// Per-metric running bounds across every value written to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extrema {
    maximums: [Option<f64>; Metric::COUNT],
    minimums: [Option<f64>; Metric::COUNT],
}

impl Extrema {
    pub fn maximum(&self, m: Metric) -> Option<f64> {
        self.maximums[m.index()]
    }

    pub fn minimum(&self, m: Metric) -> Option<f64> {
        self.minimums[m.index()]
    }

    fn observe(&mut self, m: Metric, value: f64, tracking: MinimumTracking) {
        let i = m.index();
        self.maximums[i] = Some(self.maximums[i].unwrap_or(0.0).max(value));
        self.minimums[i] = Some(match tracking {
            MinimumTracking::Legacy => self.minimums[i].unwrap_or(0.0).max(value),
            MinimumTracking::True => self.minimums[i].map_or(value, |lo| lo.min(value)),
        });
    }
}

#[derive(Debug, Default)]
struct Cell {
    attrs: RegionAttrs,
    contributions: u32,
    // Only read under `Averaging::RunningMean`.
    processing_time_sum: f64,
}

/// Accumulates decoded rows into year → alpha3 → record.
///
/// Rows must be folded in arrival order: the pairwise processing-time
/// merge depends on it.
#[derive(Debug, Default)]
pub struct AggregationStore {
    config: AggregationConfig,
    years: BTreeMap<String, BTreeMap<String, Cell>>,
    extrema: Extrema,
    rows: u64,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AggregationConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    pub fn fold(&mut self, row: DecodedRow) {
        let AggregationConfig { minimum_tracking, averaging } = self.config;
        self.rows += 1;

        let bucket = self.years.entry(row.year).or_default();
        let existed = bucket.contains_key(&row.alpha3);
        if existed {
            tracing::debug!(alpha3 = %row.alpha3, "merging repeated row");
        }
        let cell = bucket.entry(row.alpha3).or_default();
        cell.attrs.country = Some(row.country);
        cell.contributions += 1;
        cell.processing_time_sum += row.metrics[Metric::AvgProcessingTime.index()];

        for m in Metric::ALL {
            let incoming = row.metrics[m.index()];
            let value = match cell.attrs.metric(m).filter(|_| existed) {
                None => incoming,
                Some(prev) => match (m.merge_rule(), averaging) {
                    (MergeRule::Sum, _) => prev + incoming,
                    (MergeRule::FlooredMean, Averaging::Pairwise) => ((prev + incoming) / 2.0).floor(),
                    (MergeRule::FlooredMean, Averaging::RunningMean) => {
                        (cell.processing_time_sum / f64::from(cell.contributions)).floor()
                    }
                },
            };
            cell.attrs.metrics[m.index()] = Some(value);
            self.extrema.observe(m, value, minimum_tracking);
        }
    }

    /// Folds rows in order until the source yields an error. Rows folded
    /// before the error stay in the store.
    pub fn try_fold_all<I, E>(&mut self, rows: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<DecodedRow, E>>,
    {
        for row in rows {
            self.fold(row?);
        }
        Ok(())
    }

    pub fn row_count(&self) -> u64 {
        self.rows
    }

    pub fn maximum(&self, m: Metric) -> Option<f64> {
        self.extrema.maximum(m)
    }

    pub fn minimum(&self, m: Metric) -> Option<f64> {
        self.extrema.minimum(m)
    }

    /// Freezes the accumulated state into the query facade.
    pub fn finish(self) -> Dataset {
        let regions: usize = self.years.values().map(BTreeMap::len).sum();
        tracing::info!(rows = self.rows, years = self.years.len(), regions, "dataset ready");

        let years = self
            .years
            .into_iter()
            .map(|(year, bucket)| {
                let bucket = bucket.into_iter().map(|(alpha3, cell)| (alpha3, cell.attrs)).collect();
                (year, bucket)
            })
            .collect();
        Dataset::new(years, self.extrema)
    }
}
