pub mod error;
/// Rule-based shedding decision over a single row.
pub mod estimator;
pub mod pipeline;
/// Aggregate statistics over a batch of assessments.
pub mod report;
/// Hour-of-day threshold table.
pub mod threshold;
pub mod types;
