use std::collections::BTreeMap;

use crate::model::metric::Metric;
use crate::model::region::{RegionAttrs, RegionRecord};
use crate::model::store::Extrema;
use crate::scale::catalog;
use crate::scale::threshold::ThresholdScale;

/// Frozen aggregation, queried by the rendering layer.
///
/// Every method is a read; share it behind an `Arc` for concurrent readers.
#[derive(Debug, Clone)]
pub struct Dataset {
    years: BTreeMap<String, BTreeMap<String, RegionAttrs>>,
    extrema: Extrema,
    year_keys: Vec<String>,
}

impl Dataset {
    pub(crate) fn new(years: BTreeMap<String, BTreeMap<String, RegionAttrs>>, extrema: Extrema) -> Self {
        let year_keys = years.keys().cloned().collect();
        Self { years, extrema, year_keys }
    }

    /// `None` for an unknown year. A known year without `alpha3` yields an
    /// empty record so the map can still paint the region.
    pub fn region_in(&self, year: &str, alpha3: &str) -> Option<RegionRecord> {
        let bucket = self.years.get(year)?;
        Some(match bucket.get(alpha3) {
            Some(attrs) => RegionRecord::new(alpha3, attrs.clone()),
            None => RegionRecord::empty(alpha3),
        })
    }

    /// All regions recorded for `year`, ordered by alpha3.
    pub fn regions_in<'a>(&'a self, year: &str) -> impl Iterator<Item = RegionRecord> + 'a {
        self.years
            .get(year)
            .into_iter()
            .flat_map(|bucket| bucket.iter())
            .map(|(alpha3, attrs)| RegionRecord::new(alpha3.as_str(), attrs.clone()))
    }

    /// Catalog scheme when the metric has one; otherwise `BLUES_7` spread
    /// between the stored minimum and maximum.
    pub fn color_scale_for(&self, metric: Metric) -> ThresholdScale {
        match catalog::definition_for(metric) {
            Some(def) => ThresholdScale::from_definition(def),
            None => {
                let lower = self.extrema.minimum(metric).unwrap_or(0.0);
                let upper = self.extrema.maximum(metric).unwrap_or(0.0);
                ThresholdScale::sequential(lower, upper)
            }
        }
    }

    pub fn labels_for(&self, metric: Metric) -> Vec<(&'static str, &'static str)> {
        catalog::labels_for(metric)
    }

    /// Sorted ascending, no duplicates.
    pub fn available_years(&self) -> &[String] {
        &self.year_keys
    }

    pub fn maximum(&self, metric: Metric) -> Option<f64> {
        self.extrema.maximum(metric)
    }

    pub fn minimum(&self, metric: Metric) -> Option<f64> {
        self.extrema.minimum(metric)
    }
}
