use std::io::Read;
use std::path::Path;

use anyhow::Context;
use csv::ByteRecord;

use crate::config::AggregationConfig;
use crate::error::DecodeError;
use crate::io::rows::{DecodedRow, RawRow};
use crate::model::dataset::Dataset;
use crate::model::store::AggregationStore;

/// Decoded rows of a CSV source with header `Year,Country,Alpha3,Queued,...`.
/// Extra columns are ignored; missing metric columns decode as 0. Records are
/// read as bytes so a cell that is not UTF-8 only affects that cell.
pub fn csv_rows<R: Read>(reader: R) -> impl Iterator<Item = Result<DecodedRow, DecodeError>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let (headers, header_err) = match rdr.byte_headers() {
        Ok(h) => (h.clone(), None),
        Err(e) => (ByteRecord::new(), Some(DecodeError::from(e))),
    };
    let records = if header_err.is_some() { 0 } else { usize::MAX };

    header_err.map(Err).into_iter().chain(rdr.into_byte_records().take(records).enumerate().map(
        move |(i, result)| {
            let record = result?;
            // header is line 1
            let line = record.position().map_or(i as u64 + 2, |p| p.line());
            let raw: RawRow = record.deserialize(Some(&headers))?;
            raw.decode(line)
        },
    ))
}

/// Folds every row of `reader` into a fresh store. On a decode error the
/// store built so far is returned alongside it.
pub fn fold_csv<R: Read>(reader: R, config: AggregationConfig) -> (AggregationStore, Option<DecodeError>) {
    let mut store = AggregationStore::with_config(config);
    match store.try_fold_all(csv_rows(reader)) {
        Ok(()) => (store, None),
        Err(e) => {
            tracing::warn!(rows = store.row_count(), error = %e, "CSV load stopped early");
            (store, Some(e))
        }
    }
}

pub fn read_dataset<R: Read>(reader: R, config: AggregationConfig) -> Result<Dataset, DecodeError> {
    match fold_csv(reader, config) {
        (store, None) => Ok(store.finish()),
        (_, Some(e)) => Err(e),
    }
}

/// Load the citizenship statistics CSV at `path`.
pub fn load_dataset_csv(path: impl AsRef<Path>, config: AggregationConfig) -> anyhow::Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open citizenship CSV: {}", path.display()))?;
    read_dataset(file, config).with_context(|| format!("Failed to decode citizenship CSV: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::metric::Metric;
    use std::io::Cursor;

    const HEADER: &str = "Year,Country,Alpha3,Queued,Dequeued,Granted,Refused,Canceled,Pending,AvgProcessingTime\n";

    #[test]
    fn rows_carry_line_numbers_in_errors() {
        let csv = format!("{HEADER}2020,A,AAA,1,1,1,1,1,1,1\n2020,B,,1,1,1,1,1,1,1\n");
        let rows: Vec<_> = csv_rows(Cursor::new(csv)).collect();
        assert!(rows[0].is_ok());
        assert!(matches!(rows[1], Err(DecodeError::MissingJoinKey { field: "Alpha3", line: 3 })));
    }

    #[test]
    fn fold_csv_keeps_partial_store() {
        let csv = format!("{HEADER}2020,A,AAA,1,0,4,0,0,0,0\n,B,BBB,1,0,4,0,0,0,0\n2020,C,CCC,1,0,9,0,0,0,0\n");
        let (store, err) = fold_csv(Cursor::new(csv), AggregationConfig::default());
        assert!(matches!(err, Some(DecodeError::MissingJoinKey { field: "Year", .. })));
        assert_eq!(store.row_count(), 1);
        let d = store.finish();
        assert_eq!(d.region_in("2020", "AAA").unwrap().granted(), 4.0);
        assert_eq!(d.region_in("2020", "CCC").unwrap().country(), None);
    }

    #[test]
    fn missing_metric_columns_decode_as_zero() {
        let csv = "Year,Alpha3,Country,Granted\n2018,NOR,Norway,3\n";
        let d = read_dataset(Cursor::new(csv), AggregationConfig::default()).unwrap();
        let r = d.region_in("2018", "NOR").unwrap();
        assert_eq!(r.granted(), 3.0);
        assert_eq!(r.get(Metric::Pending).and_then(|v| v.as_number()), Some(0.0));
    }

    #[test]
    fn non_utf8_metric_cell_decodes_as_zero() {
        let mut csv = HEADER.as_bytes().to_vec();
        csv.extend_from_slice(b"2020,A,AAA,1,0,\xff\xfe,0,0,0,0\n2020,B,BBB,1,0,6,0,0,0,0\n");
        let (store, err) = fold_csv(Cursor::new(csv), AggregationConfig::default());
        assert!(err.is_none());
        assert_eq!(store.row_count(), 2);
        let d = store.finish();
        let a = d.region_in("2020", "AAA").unwrap();
        assert_eq!(a.granted(), 0.0);
        assert_eq!(a.incoming(), 1.0);
        assert_eq!(d.region_in("2020", "BBB").unwrap().granted(), 6.0);
    }

    #[test]
    fn lowercase_codes_are_reachable_by_uppercase_lookup() {
        let csv = format!("{HEADER}2020,Chile,chl,0,0,2,0,0,0,0\n2020,Chile,CHL,0,0,3,0,0,0,0\n");
        let d = read_dataset(Cursor::new(csv), AggregationConfig::default()).unwrap();
        assert_eq!(d.region_in("2020", "CHL").unwrap().granted(), 5.0);
    }
}
