//! Threshold-setting and estimation over a sequence of hourly records.

use serde::Deserialize;
use tracing::{debug, info};

use super::error::EstimateError;
use super::estimator::LoadSheddingEstimator;
use super::threshold::ThresholdTable;
use super::types::{Assessment, HourlyRecord};

/// Header name of the timestamp column unless configured otherwise.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "timestamp";

/// Where each row's `load_shedding_threshold` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    /// Looked up from the record's hour of day, replacing any column value.
    #[default]
    Hour,
    /// Taken as-is from the `load_shedding_threshold` column.
    Column,
}

/// Sets thresholds and runs the estimator for each record.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub table: ThresholdTable,
    pub source: ThresholdSource,
    pub estimator: LoadSheddingEstimator,
    /// Column reported when a record has no timestamp.
    pub timestamp_column: String,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(
            ThresholdTable::default(),
            ThresholdSource::default(),
            LoadSheddingEstimator::default(),
        )
    }
}

impl Pipeline {
    pub fn new(
        table: ThresholdTable,
        source: ThresholdSource,
        estimator: LoadSheddingEstimator,
    ) -> Self {
        Self {
            table,
            source,
            estimator,
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
        }
    }

    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = column.into();
        self
    }

    /// Assesses a single record.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::MissingField`] naming the timestamp column
    /// when thresholds are derived by hour and the record has none.
    pub fn assess(&self, record: &HourlyRecord) -> Result<Assessment, EstimateError> {
        let hour = record.hour();
        let row = match self.source {
            ThresholdSource::Column => record.row,
            ThresholdSource::Hour => {
                let hour = hour.ok_or_else(|| EstimateError::MissingField {
                    field: self.timestamp_column.clone(),
                })?;
                record.row.with_threshold(f64::from(self.table.select(hour)))
            }
        };

        let assessment = Assessment {
            timestamp: record.timestamp,
            hour,
            ..self.estimator.assess(record.line, &row)
        };
        if assessment.trigger.is_shedding() {
            debug!(
                line = assessment.line,
                trigger = %assessment.trigger,
                adjusted_deficit = assessment.adjusted_deficit,
                threshold = assessment.threshold,
                "load shedding"
            );
        }
        Ok(assessment)
    }

    /// Assesses every record, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Pipeline::assess`].
    pub fn assess_all(&self, records: &[HourlyRecord]) -> Result<Vec<Assessment>, EstimateError> {
        let assessments = records
            .iter()
            .map(|record| self.assess(record))
            .collect::<Result<Vec<_>, _>>()?;

        let shedding = assessments.iter().filter(|a| a.load_shedding == 1).count();
        info!(rows = assessments.len(), shedding, "assessed records");
        Ok(assessments)
    }
}
