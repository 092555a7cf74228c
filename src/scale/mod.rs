pub mod catalog;
pub mod threshold;
