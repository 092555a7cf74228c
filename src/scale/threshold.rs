use crate::scale::catalog::ScaleDefinition;

/// Sequential 7-step blue palette used when a metric has no fixed scheme.
pub const BLUES_7: [&str; 7] = [
    "#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#084594",
];

/// Maps a number to a color by the ascending thresholds it has passed.
///
/// `value < domain[0]` gives `range[0]`, `domain[i-1] <= value < domain[i]`
/// gives `range[i]`. Indices past the end of the range clamp to its last color.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScale {
    domain: Vec<f64>,
    range: Vec<&'static str>,
}

impl ThresholdScale {
    /// Returns `None` for an empty range; there is nothing to classify into.
    pub fn new(domain: Vec<f64>, range: Vec<&'static str>) -> Option<Self> {
        if range.is_empty() {
            return None;
        }
        Some(Self { domain, range })
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn range(&self) -> &[&'static str] {
        &self.range
    }

    pub fn classify(&self, value: f64) -> &'static str {
        if value.is_nan() {
            return self.range[0];
        }
        // bisect right
        let idx = self.domain.partition_point(|&b| b <= value);
        self.range[idx.min(self.range.len() - 1)]
    }

    pub(crate) fn from_definition(def: &ScaleDefinition) -> Self {
        Self { domain: def.boundaries.to_vec(), range: def.colors.to_vec() }
    }

    /// `BLUES_7` over six evenly spaced thresholds from `lower` to `upper` inclusive.
    pub(crate) fn sequential(lower: f64, upper: f64) -> Self {
        Self {
            domain: evenly_spaced(lower, upper, BLUES_7.len() - 1),
            range: BLUES_7.to_vec(),
        }
    }
}

fn evenly_spaced(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![lower; n];
    }
    let step = (upper - lower) / (n - 1) as f64;
    (0..n).map(|i| lower + step * i as f64).collect()
}
