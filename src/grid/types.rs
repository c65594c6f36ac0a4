//! Core grid types: metric rows, hours of day, and per-row assessments.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::EstimateError;

/// Hour of the day in local time, validated to `[0, 23]`.
///
/// # Examples
///
/// ```
/// use loadshed::grid::types::Hour;
///
/// assert_eq!(Hour::new(19).map(Hour::get), Ok(19));
/// assert!(Hour::new(24).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Hour(u8);

impl Hour {
    /// Number of hours in a day.
    pub const COUNT: usize = 24;

    /// Creates an hour, rejecting anything outside `[0, 23]`.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidHour`] for out-of-range input.
    pub fn new(hour: i64) -> Result<Self, EstimateError> {
        match u8::try_from(hour) {
            Ok(h) if usize::from(h) < Self::COUNT => Ok(Self(h)),
            _ => Err(EstimateError::InvalidHour(hour)),
        }
    }

    /// Hour taken from a timestamp. Always valid.
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        use chrono::Timelike;
        // chrono guarantees hour() < 24
        Self(timestamp.hour() as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All 24 hours in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Fields of a [`GridMetricsRow`], in column order of the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ResidualDemand,
    DispatchableGeneration,
    EskomOcgtGeneration,
    HydroWaterGeneration,
    TotalUclfOclf,
    ManualLoadReduction,
    InternationalImports,
    InternationalExports,
    LoadSheddingThreshold,
}

impl Field {
    pub const COUNT: usize = 9;

    pub const ALL: [Self; Self::COUNT] = [
        Self::ResidualDemand,
        Self::DispatchableGeneration,
        Self::EskomOcgtGeneration,
        Self::HydroWaterGeneration,
        Self::TotalUclfOclf,
        Self::ManualLoadReduction,
        Self::InternationalImports,
        Self::InternationalExports,
        Self::LoadSheddingThreshold,
    ];

    /// Canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ResidualDemand => "residual_demand",
            Self::DispatchableGeneration => "dispatchable_generation",
            Self::EskomOcgtGeneration => "eskom_ocgt_generation",
            Self::HydroWaterGeneration => "hydro_water_generation",
            Self::TotalUclfOclf => "total_uclf_oclf",
            Self::ManualLoadReduction => "manual_load_reduction",
            Self::InternationalImports => "international_imports",
            Self::InternationalExports => "international_exports",
            Self::LoadSheddingThreshold => "load_shedding_threshold",
        }
    }

    /// Column headers used for this field in the published grid dataset.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::TotalUclfOclf => &["total_uclf+oclf"],
            Self::ManualLoadReduction => &["manual_load_reduction(mlr)"],
            _ => &[],
        }
    }

    /// Returns `true` if `header` names this field.
    pub fn matches(self, header: &str) -> bool {
        let header = header.trim();
        header == self.name() || self.aliases().contains(&header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One hour of grid metrics, all in consistent units (MW).
///
/// Values may be negative; only finiteness is expected of them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GridMetricsRow {
    /// Demand left after subtracting renewable generation.
    pub residual_demand: f64,
    /// Controllable generation available.
    pub dispatchable_generation: f64,
    /// Backup supply from open-cycle gas turbines.
    pub eskom_ocgt_generation: f64,
    /// Backup supply from hydro.
    pub hydro_water_generation: f64,
    /// Unplanned plus planned outage capacity. Not used by the decision.
    pub total_uclf_oclf: f64,
    /// Utility-initiated manual load reduction (MLR).
    pub manual_load_reduction: f64,
    pub international_imports: f64,
    pub international_exports: f64,
    /// Deficit threshold at which shedding is considered active.
    pub load_shedding_threshold: f64,
}

impl GridMetricsRow {
    /// Builds a row by asking `lookup` for every field.
    ///
    /// `lookup` returns `None` when the field is absent from the source.
    /// Fields listed in `optional` fall back to `0.0` instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::MissingField`] for the first required field
    /// that `lookup` cannot supply.
    pub fn from_lookup<F>(mut lookup: F, optional: &[Field]) -> Result<Self, EstimateError>
    where
        F: FnMut(Field) -> Option<f64>,
    {
        let mut get = |field: Field| match lookup(field) {
            Some(value) => Ok(value),
            None if optional.contains(&field) => Ok(0.0),
            None => Err(EstimateError::MissingField {
                field: field.name().to_string(),
            }),
        };

        Ok(Self {
            residual_demand: get(Field::ResidualDemand)?,
            dispatchable_generation: get(Field::DispatchableGeneration)?,
            eskom_ocgt_generation: get(Field::EskomOcgtGeneration)?,
            hydro_water_generation: get(Field::HydroWaterGeneration)?,
            total_uclf_oclf: get(Field::TotalUclfOclf)?,
            manual_load_reduction: get(Field::ManualLoadReduction)?,
            international_imports: get(Field::InternationalImports)?,
            international_exports: get(Field::InternationalExports)?,
            load_shedding_threshold: get(Field::LoadSheddingThreshold)?,
        })
    }

    /// Raw shortfall: `(demand + exports) - (supply + imports)`.
    pub fn deficit(&self) -> f64 {
        (self.residual_demand + self.international_exports)
            - (self.dispatchable_generation + self.international_imports)
    }

    /// Shortfall left after OCGT and hydro backup supply.
    pub fn adjusted_deficit(&self) -> f64 {
        self.deficit() - self.eskom_ocgt_generation - self.hydro_water_generation
    }

    /// Same row with its threshold replaced.
    pub fn with_threshold(self, threshold: f64) -> Self {
        Self {
            load_shedding_threshold: threshold,
            ..self
        }
    }
}

/// One row of the source table with its optional timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// 1-based line in the source table (header is line 1).
    pub line: usize,
    pub timestamp: Option<NaiveDateTime>,
    pub row: GridMetricsRow,
}

impl HourlyRecord {
    pub fn hour(&self) -> Option<Hour> {
        self.timestamp.as_ref().map(Hour::of)
    }
}

/// Which rule of the estimator declared shedding, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Neither rule fired.
    None,
    /// Backup-adjusted deficit met the threshold.
    Deficit,
    /// Manual load reduction covered the deficit.
    ManualReduction,
}

impl Trigger {
    pub fn is_shedding(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Deficit => "deficit",
            Self::ManualReduction => "manual_reduction",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete record of one evaluated row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    /// 1-based line in the source table (header is line 1).
    pub line: usize,
    pub timestamp: Option<NaiveDateTime>,
    pub hour: Option<Hour>,
    /// Threshold the decision was made against.
    pub threshold: f64,
    pub deficit: f64,
    pub adjusted_deficit: f64,
    pub trigger: Trigger,
    /// Binary decision: 1 when shedding is active.
    pub load_shedding: u8,
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = self
            .timestamp
            .map_or_else(|| format!("line {}", self.line), |ts| ts.to_string());
        write!(
            f,
            "{when:>19} | deficit={:>9.1} adjusted={:>9.1} threshold={:>6.0} | shedding={} ({})",
            self.deficit, self.adjusted_deficit, self.threshold, self.load_shedding, self.trigger,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> GridMetricsRow {
        GridMetricsRow {
            residual_demand: 5000.0,
            dispatchable_generation: 3000.0,
            eskom_ocgt_generation: 200.0,
            hydro_water_generation: 100.0,
            total_uclf_oclf: 0.0,
            manual_load_reduction: 500.0,
            international_imports: 300.0,
            international_exports: 100.0,
            load_shedding_threshold: 1500.0,
        }
    }

    #[test]
    fn hour_accepts_full_day() {
        for h in 0..24 {
            assert_eq!(Hour::new(h).map(Hour::get), Ok(h as u8));
        }
    }

    #[test]
    fn hour_rejects_out_of_range() {
        assert_eq!(Hour::new(24), Err(EstimateError::InvalidHour(24)));
        assert_eq!(Hour::new(-1), Err(EstimateError::InvalidHour(-1)));
        assert_eq!(Hour::new(300), Err(EstimateError::InvalidHour(300)));
    }

    #[test]
    fn hour_of_timestamp() {
        let ts = NaiveDateTime::parse_from_str("2024-01-02 19:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("timestamp should parse");
        assert_eq!(Hour::of(&ts).get(), 19);
    }

    #[test]
    fn all_hours_in_order() {
        let hours: Vec<u8> = Hour::all().map(Hour::get).collect();
        assert_eq!(hours, (0..24).collect::<Vec<u8>>());
    }

    #[test]
    fn field_aliases_match_dataset_headers() {
        assert!(Field::ManualLoadReduction.matches("manual_load_reduction(mlr)"));
        assert!(Field::ManualLoadReduction.matches("manual_load_reduction"));
        assert!(Field::TotalUclfOclf.matches(" total_uclf+oclf "));
        assert!(!Field::ResidualDemand.matches("demand"));
    }

    #[test]
    fn deficit_arithmetic() {
        let row = scenario_a();
        assert_eq!(row.deficit(), 1800.0);
        assert_eq!(row.adjusted_deficit(), 1500.0);
    }

    #[test]
    fn negative_deficit_is_not_clamped() {
        let row = GridMetricsRow {
            residual_demand: 2000.0,
            ..scenario_a()
        };
        assert_eq!(row.deficit(), -1200.0);
        assert_eq!(row.adjusted_deficit(), -1500.0);
    }

    #[test]
    fn from_lookup_reports_first_missing_field() {
        let result = GridMetricsRow::from_lookup(
            |field| (field != Field::HydroWaterGeneration).then_some(1.0),
            &[],
        );
        assert_eq!(
            result,
            Err(EstimateError::MissingField {
                field: "hydro_water_generation".to_string()
            })
        );
    }

    #[test]
    fn from_lookup_defaults_optional_fields() {
        let result = GridMetricsRow::from_lookup(
            |field| (field != Field::LoadSheddingThreshold).then_some(7.0),
            &[Field::LoadSheddingThreshold],
        );
        let row = result.expect("optional field should default");
        assert_eq!(row.load_shedding_threshold, 0.0);
        assert_eq!(row.residual_demand, 7.0);
    }

    #[test]
    fn with_threshold_only_changes_threshold() {
        let row = scenario_a();
        let updated = row.with_threshold(2100.0);
        assert_eq!(updated.load_shedding_threshold, 2100.0);
        assert_eq!(updated.deficit(), row.deficit());
    }

    #[test]
    fn trigger_shedding_flags() {
        assert!(!Trigger::None.is_shedding());
        assert!(Trigger::Deficit.is_shedding());
        assert!(Trigger::ManualReduction.is_shedding());
    }
}
