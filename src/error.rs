//! Errors raised at the row-decoding boundary.
//!
//! Per-metric parse failures are not errors; they decode as 0.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    /// A row without `Year` or `Alpha3` cannot be placed in the store.
    #[error("row {line}: missing join key `{field}`")]
    MissingJoinKey { field: &'static str, line: u64 },

    /// The CSV reader could not produce a record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
