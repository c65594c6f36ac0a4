use thiserror::Error;

/// Errors raised while building or evaluating a grid-metrics row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },
    #[error("hour {0} is outside 0..=23")]
    InvalidHour(i64),
}
