use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::error::DecodeError;
use crate::model::metric::Metric;

/// One input record with its join keys checked and metrics parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    pub year: String,
    pub country: String,
    pub alpha3: String,
    pub metrics: [f64; Metric::COUNT],
}

impl DecodedRow {
    pub fn metric(&self, m: Metric) -> f64 {
        self.metrics[m.index()]
    }

    /// Decodes a flat field-name → raw-string mapping. `line` is only used in errors.
    pub fn from_fields(fields: &HashMap<String, String>, line: u64) -> Result<Self, DecodeError> {
        let raw = RawRow {
            year: fields.get("Year").cloned(),
            country: fields.get("Country").cloned(),
            alpha3: fields.get("Alpha3").cloned(),
            queued: fields.get("Queued").cloned(),
            dequeued: fields.get("Dequeued").cloned(),
            granted: fields.get("Granted").cloned(),
            refused: fields.get("Refused").cloned(),
            canceled: fields.get("Canceled").cloned(),
            pending: fields.get("Pending").cloned(),
            avg_processing_time: fields.get("AvgProcessingTime").cloned(),
        };
        raw.decode(line)
    }
}

/// Row shape as read from the CSV header. Every column is optional so that a
/// missing, blank or non-UTF-8 cell reaches the decoder instead of failing
/// deserialization.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRow {
    #[serde(rename = "Year", default, deserialize_with = "lenient_text")]
    year: Option<String>,
    #[serde(rename = "Country", default, deserialize_with = "lenient_text")]
    country: Option<String>,
    #[serde(rename = "Alpha3", default, deserialize_with = "lenient_text")]
    alpha3: Option<String>,
    #[serde(rename = "Queued", default, deserialize_with = "lenient_text")]
    queued: Option<String>,
    #[serde(rename = "Dequeued", default, deserialize_with = "lenient_text")]
    dequeued: Option<String>,
    #[serde(rename = "Granted", default, deserialize_with = "lenient_text")]
    granted: Option<String>,
    #[serde(rename = "Refused", default, deserialize_with = "lenient_text")]
    refused: Option<String>,
    #[serde(rename = "Canceled", default, deserialize_with = "lenient_text")]
    canceled: Option<String>,
    #[serde(rename = "Pending", default, deserialize_with = "lenient_text")]
    pending: Option<String>,
    #[serde(rename = "AvgProcessingTime", default, deserialize_with = "lenient_text")]
    avg_processing_time: Option<String>,
}

/// Reads a cell as raw bytes; bytes that are not UTF-8 become `None`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a text cell")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(std::str::from_utf8(v).ok().map(str::to_string))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_bytes(TextVisitor)
}

impl RawRow {
    pub(crate) fn decode(self, line: u64) -> Result<DecodedRow, DecodeError> {
        let year = join_key(self.year, "Year", line)?;
        let alpha3 = join_key(self.alpha3, "Alpha3", line)?.to_ascii_uppercase();

        let cells = [
            self.queued,
            self.dequeued,
            self.granted,
            self.refused,
            self.canceled,
            self.pending,
            self.avg_processing_time,
        ];
        let mut metrics = [0.0; Metric::COUNT];
        for (m, cell) in Metric::ALL.into_iter().zip(cells) {
            metrics[m.index()] = parse_metric(cell.as_deref(), m, line);
        }

        Ok(DecodedRow {
            year,
            country: self.country.unwrap_or_default(),
            alpha3,
            metrics,
        })
    }
}

fn join_key(value: Option<String>, field: &'static str, line: u64) -> Result<String, DecodeError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DecodeError::MissingJoinKey { field, line }),
    }
}

/// Blank, unparseable and non-finite cells all decode as 0.
fn parse_metric(cell: Option<&str>, metric: Metric, line: u64) -> f64 {
    let Some(raw) = cell.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0.0;
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::trace!(line, %metric, raw, "malformed metric, using 0");
            0.0
        }
    }
}
