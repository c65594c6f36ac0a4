//! Post-hoc summary of a batch of assessments.

use std::fmt;

use serde::Serialize;

use super::types::{Assessment, Hour, Trigger};

/// Aggregate statistics derived from a complete set of assessments.
///
/// Computed post-hoc from `&[Assessment]` so that the report and the
/// exported rows always agree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShedReport {
    /// Number of rows evaluated.
    pub rows: usize,
    /// Rows where shedding was declared.
    pub shedding_rows: usize,
    /// Share of rows with shedding, in percent.
    pub shedding_pct: f64,
    /// Rows flagged by the backup-adjusted deficit rule.
    pub deficit_triggers: usize,
    /// Rows flagged only by the manual load reduction rule.
    pub manual_reduction_triggers: usize,
    /// Largest backup-adjusted deficit seen, if any rows were evaluated.
    pub peak_adjusted_deficit: Option<f64>,
    /// Shedding rows per hour of day. Rows without a timestamp are not counted.
    pub shedding_by_hour: [usize; Hour::COUNT],
}

impl ShedReport {
    pub fn from_assessments(assessments: &[Assessment]) -> Self {
        let mut shedding_rows = 0_usize;
        let mut deficit_triggers = 0_usize;
        let mut manual_reduction_triggers = 0_usize;
        let mut peak_adjusted_deficit: Option<f64> = None;
        let mut shedding_by_hour = [0_usize; Hour::COUNT];

        for a in assessments {
            match a.trigger {
                Trigger::Deficit => deficit_triggers += 1,
                Trigger::ManualReduction => manual_reduction_triggers += 1,
                Trigger::None => {}
            }
            if a.load_shedding == 1 {
                shedding_rows += 1;
                if let Some(hour) = a.hour {
                    shedding_by_hour[usize::from(hour.get())] += 1;
                }
            }
            peak_adjusted_deficit = Some(
                peak_adjusted_deficit.map_or(a.adjusted_deficit, |p| p.max(a.adjusted_deficit)),
            );
        }

        let shedding_pct = if assessments.is_empty() {
            0.0
        } else {
            100.0 * shedding_rows as f64 / assessments.len() as f64
        };

        Self {
            rows: assessments.len(),
            shedding_rows,
            shedding_pct,
            deficit_triggers,
            manual_reduction_triggers,
            peak_adjusted_deficit,
            shedding_by_hour,
        }
    }

    /// Hour with the most shedding rows. Ties go to the earliest hour.
    pub fn busiest_hour(&self) -> Option<Hour> {
        let (hour, count) = self
            .shedding_by_hour
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, count)| *count)?;
        if *count == 0 {
            return None;
        }
        Hour::new(hour as i64).ok()
    }
}

impl fmt::Display for ShedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Load Shedding Report ---")?;
        writeln!(f, "Rows evaluated:        {}", self.rows)?;
        writeln!(
            f,
            "Shedding rows:         {} ({:.1}%)",
            self.shedding_rows, self.shedding_pct
        )?;
        writeln!(f, "  by deficit:          {}", self.deficit_triggers)?;
        writeln!(f, "  by manual reduction: {}", self.manual_reduction_triggers)?;
        match self.peak_adjusted_deficit {
            Some(peak) => writeln!(f, "Peak adjusted deficit: {peak:.1} MW")?,
            None => writeln!(f, "Peak adjusted deficit: n/a")?,
        }
        match self.busiest_hour() {
            Some(hour) => write!(
                f,
                "Busiest hour:          {hour} ({} rows)",
                self.shedding_by_hour[usize::from(hour.get())]
            ),
            None => write!(f, "Busiest hour:          n/a"),
        }
    }
}
