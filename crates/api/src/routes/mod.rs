pub mod cache;
pub mod charts;
pub mod dividends;
pub mod lists;
pub mod thresholds;
