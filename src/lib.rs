//! Rule-based electricity load-shedding estimation from hourly grid metrics.

pub mod cli;
pub mod config;
/// Threshold selection, shedding decision, and batch reporting.
pub mod grid;
/// CSV ingest and export.
pub mod io;

pub use grid::estimator::estimate;
pub use grid::threshold::select_threshold;
