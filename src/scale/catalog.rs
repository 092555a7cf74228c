use crate::model::metric::Metric;

/// Fixed classification of a metric: ascending thresholds with one color and label each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDefinition {
    pub boundaries: &'static [f64],
    pub colors: &'static [&'static str],
    pub labels: &'static [&'static str],
}

/// Day-count thresholds from "undefined" up to four years.
pub const AVG_PROCESSING_TIME: ScaleDefinition = ScaleDefinition {
    boundaries: &[1.0, 90.0, 180.0, 270.0, 365.0, 545.0, 730.0, 1095.0, 1460.0],
    colors: &[
        "#ccc", "#fa0", "#f5e800", "#5fcd59", "#15928d", "#2e6590", "#453182", "#450055", "#000",
    ],
    labels: &[
        "undefined",
        "under 3 months",
        "up to 6 months",
        "up to 9 months",
        "up to 1 year",
        "up to 18 months",
        "up to 2 years",
        "up to 3 years",
        "up to 4 years",
    ],
};

pub fn definition_for(metric: Metric) -> Option<&'static ScaleDefinition> {
    match metric {
        Metric::AvgProcessingTime => Some(&AVG_PROCESSING_TIME),
        Metric::Queued
        | Metric::Dequeued
        | Metric::Granted
        | Metric::Refused
        | Metric::Canceled
        | Metric::Pending => None,
    }
}

pub fn boundaries_for(metric: Metric) -> Option<&'static [f64]> {
    definition_for(metric).map(|d| d.boundaries)
}

pub fn colors_for(metric: Metric) -> Option<&'static [&'static str]> {
    definition_for(metric).map(|d| d.colors)
}

/// `(label, color)` pairs in threshold order; empty when the metric has no fixed scheme.
pub fn labels_for(metric: Metric) -> Vec<(&'static str, &'static str)> {
    definition_for(metric)
        .map(|d| d.labels.iter().copied().zip(d.colors.iter().copied()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_time_scheme_is_consistent() {
        let d = definition_for(Metric::AvgProcessingTime).unwrap();
        assert_eq!(d.boundaries.len(), 9);
        assert_eq!(d.colors.len(), 9);
        assert_eq!(d.labels.len(), 9);
        assert!(d.boundaries.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn counts_have_no_fixed_scheme() {
        for m in Metric::ALL.into_iter().filter(|m| *m != Metric::AvgProcessingTime) {
            assert!(boundaries_for(m).is_none());
            assert!(colors_for(m).is_none());
            assert!(labels_for(m).is_empty());
        }
    }

    #[test]
    fn labels_pair_with_colors() {
        let labels = labels_for(Metric::AvgProcessingTime);
        assert_eq!(labels[0], ("undefined", "#ccc"));
        assert_eq!(labels[7], ("up to 3 years", "#450055"));
        assert_eq!(labels.last(), Some(&("up to 4 years", "#000")));
    }
}
