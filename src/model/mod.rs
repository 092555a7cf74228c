pub mod dataset;
pub mod metric;
pub mod region;
pub mod store;
