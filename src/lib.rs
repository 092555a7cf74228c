pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod scale;

pub use config::{AggregationConfig, Averaging, MinimumTracking};
pub use error::DecodeError;
pub use io::csv_loader::{csv_rows, fold_csv, load_dataset_csv, read_dataset};
pub use io::rows::DecodedRow;
pub use model::dataset::Dataset;
pub use model::metric::{Metric, UnknownMetric};
pub use model::region::{Attr, AttrValue, RegionAttrs, RegionRecord};
pub use model::store::{AggregationStore, Extrema};
pub use scale::threshold::{ThresholdScale, BLUES_7};
