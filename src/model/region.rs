use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::model::metric::Metric;

/// Attribute key of a region record: the display name or one of the metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Country,
    Metric(Metric),
}

impl From<Metric> for Attr {
    fn from(m: Metric) -> Self {
        Attr::Metric(m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl AttrValue<'_> {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }
}

/// Raw attribute mapping of one (year, alpha3) cell. `Default` is the empty mapping.
///
/// Serializes as a map keyed by field name, omitting absent attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionAttrs {
    pub country: Option<String>,
    pub metrics: [Option<f64>; Metric::COUNT],
}

impl RegionAttrs {
    pub fn metric(&self, m: Metric) -> Option<f64> {
        self.metrics[m.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.metrics.iter().all(Option::is_none)
    }
}

impl Serialize for RegionAttrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(country) = &self.country {
            map.serialize_entry("Country", country)?;
        }
        for m in Metric::ALL {
            if let Some(v) = self.metric(m) {
                map.serialize_entry(m.name(), &v)?;
            }
        }
        map.end()
    }
}

/// Read-only view of one region in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRecord {
    alpha3: String,
    attrs: RegionAttrs,
}

impl RegionRecord {
    pub fn new(alpha3: impl Into<String>, attrs: RegionAttrs) -> Self {
        Self { alpha3: alpha3.into(), attrs }
    }

    /// A record with no attributes; every typed accessor returns its default.
    pub fn empty(alpha3: impl Into<String>) -> Self {
        Self::new(alpha3, RegionAttrs::default())
    }

    pub fn alpha3(&self) -> &str {
        &self.alpha3
    }

    pub fn attrs(&self) -> &RegionAttrs {
        &self.attrs
    }

    pub fn get(&self, attr: impl Into<Attr>) -> Option<AttrValue<'_>> {
        match attr.into() {
            Attr::Country => self.attrs.country.as_deref().map(AttrValue::Text),
            Attr::Metric(m) => self.attrs.metric(m).map(AttrValue::Number),
        }
    }

    pub fn country(&self) -> Option<&str> {
        self.attrs.country.as_deref()
    }

    /// No default: an unknown region has no processing time rather than zero.
    pub fn avg_processing_time(&self) -> Option<f64> {
        self.attrs.metric(Metric::AvgProcessingTime)
    }

    pub fn granted(&self) -> f64 {
        self.attrs.metric(Metric::Granted).unwrap_or(0.0)
    }

    pub fn refused(&self) -> f64 {
        self.attrs.metric(Metric::Refused).unwrap_or(0.0)
    }

    /// Incoming applications, i.e. the `Queued` column.
    pub fn incoming(&self) -> f64 {
        self.attrs.metric(Metric::Queued).unwrap_or(0.0)
    }
}
