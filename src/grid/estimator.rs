//! Rule-based load-shedding estimator.

use serde::Deserialize;

use super::types::{Assessment, GridMetricsRow, Trigger};

/// How the manual-load-reduction fallback treats the raw deficit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MlrRule {
    /// `manual_load_reduction >= deficit`, whatever the sign of the deficit.
    ///
    /// Under oversupply (negative deficit) any non-negative MLR reports
    /// shedding.
    #[default]
    Literal,
    /// As `Literal`, but only when `deficit > 0`.
    PositiveDeficit,
}

impl MlrRule {
    pub const NAMES: &[&str] = &["literal", "positive_deficit"];

    /// Parses a rule name, accepting `-` or `_` as separator.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.replace('-', "_").as_str() {
            "literal" => Some(Self::Literal),
            "positive_deficit" => Some(Self::PositiveDeficit),
            _ => None,
        }
    }

    fn fires(self, manual_load_reduction: f64, deficit: f64) -> bool {
        match self {
            Self::Literal => manual_load_reduction >= deficit,
            Self::PositiveDeficit => deficit > 0.0 && manual_load_reduction >= deficit,
        }
    }
}

/// Decides whether load shedding is active for one row of grid metrics.
///
/// 1. `deficit = (demand + exports) - (supply + imports)`
/// 2. `adjusted = deficit - ocgt - hydro`
/// 3. shedding if `adjusted >= threshold`
/// 4. otherwise shedding if the MLR rule fires
///
/// Comparisons are inclusive and nothing is clamped or rounded.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadSheddingEstimator {
    pub mlr_rule: MlrRule,
}

impl LoadSheddingEstimator {
    pub fn new(mlr_rule: MlrRule) -> Self {
        Self { mlr_rule }
    }

    /// Which rule fires for `row`, if any.
    pub fn trigger(&self, row: &GridMetricsRow) -> Trigger {
        let deficit = row.deficit();
        let adjusted = row.adjusted_deficit();

        if adjusted >= row.load_shedding_threshold {
            Trigger::Deficit
        } else if self.mlr_rule.fires(row.manual_load_reduction, deficit) {
            // MLR close to the deficit strongly suggests shedding.
            Trigger::ManualReduction
        } else {
            Trigger::None
        }
    }

    /// Returns 1 if load shedding is active for `row`, 0 otherwise.
    pub fn estimate(&self, row: &GridMetricsRow) -> u8 {
        u8::from(self.trigger(row).is_shedding())
    }

    /// Full assessment of `row`. `line` is its position in the source table.
    pub fn assess(&self, line: usize, row: &GridMetricsRow) -> Assessment {
        let trigger = self.trigger(row);
        Assessment {
            line,
            timestamp: None,
            hour: None,
            threshold: row.load_shedding_threshold,
            deficit: row.deficit(),
            adjusted_deficit: row.adjusted_deficit(),
            trigger,
            load_shedding: u8::from(trigger.is_shedding()),
        }
    }
}

/// Estimates load shedding for `row` under the literal MLR rule.
pub fn estimate(row: &GridMetricsRow) -> u8 {
    LoadSheddingEstimator::default().estimate(row)
}
