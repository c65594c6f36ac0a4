//! Time-of-day deficit thresholds.

use super::types::Hour;

/// Max demand happens around 7pm.
pub const PEAK_HOUR: u8 = 19;
pub const PEAK_THRESHOLD: i32 = 2100;
/// Min demand happens around 1am.
pub const TROUGH_HOUR: u8 = 1;
pub const TROUGH_THRESHOLD: i32 = 1500;
pub const EVENING_HOURS: (u8, u8) = (17, 21);
pub const EVENING_THRESHOLD: i32 = 1950;
pub const NIGHT_HOURS: (u8, u8) = (0, 3);
pub const NIGHT_THRESHOLD: i32 = 1650;
/// Median deficit on days of confirmed load shedding.
pub const DEFAULT_THRESHOLD: i32 = 1789;

/// Hour-of-day lookup table for the load-shedding threshold.
///
/// Lookup order is fixed: peak hour, trough hour, evening range, night range,
/// then the default. The singletons sit inside the ranges, so the order is
/// what keeps hour 19 at the peak threshold rather than the evening one.
///
/// # Examples
///
/// ```
/// use loadshed::grid::threshold::ThresholdTable;
/// use loadshed::grid::types::Hour;
///
/// let table = ThresholdTable::default();
/// assert_eq!(Hour::new(19).map(|h| table.select(h)), Ok(2100));
/// assert_eq!(Hour::new(18).map(|h| table.select(h)), Ok(1950));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdTable {
    pub peak_hour: u8,
    pub peak: i32,
    pub trough_hour: u8,
    pub trough: i32,
    /// Inclusive evening window.
    pub evening_hours: (u8, u8),
    pub evening: i32,
    /// Inclusive early-morning window.
    pub night_hours: (u8, u8),
    pub night: i32,
    pub default: i32,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            peak_hour: PEAK_HOUR,
            peak: PEAK_THRESHOLD,
            trough_hour: TROUGH_HOUR,
            trough: TROUGH_THRESHOLD,
            evening_hours: EVENING_HOURS,
            evening: EVENING_THRESHOLD,
            night_hours: NIGHT_HOURS,
            night: NIGHT_THRESHOLD,
            default: DEFAULT_THRESHOLD,
        }
    }
}

impl ThresholdTable {
    /// Same threshold for every hour of the day.
    pub fn flat(threshold: i32) -> Self {
        Self {
            peak: threshold,
            trough: threshold,
            evening: threshold,
            night: threshold,
            default: threshold,
            ..Self::default()
        }
    }

    /// Threshold in effect at `hour`.
    pub fn select(&self, hour: Hour) -> i32 {
        let h = hour.get();
        let within = |(start, end): (u8, u8)| start <= h && h <= end;

        if h == self.peak_hour {
            self.peak
        } else if h == self.trough_hour {
            self.trough
        } else if within(self.evening_hours) {
            self.evening
        } else if within(self.night_hours) {
            self.night
        } else {
            self.default
        }
    }

    /// Thresholds for hours 0 through 23.
    pub fn by_hour(&self) -> [i32; Hour::COUNT] {
        let mut out = [self.default; Hour::COUNT];
        for hour in Hour::all() {
            out[usize::from(hour.get())] = self.select(hour);
        }
        out
    }
}

/// Threshold for `hour` under the default table.
pub fn select_threshold(hour: Hour) -> i32 {
    ThresholdTable::default().select(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(h: i64) -> i32 {
        select_threshold(Hour::new(h).expect("hour should be valid"))
    }

    #[test]
    fn documented_hours() {
        assert_eq!(threshold(19), 2100);
        assert_eq!(threshold(1), 1500);
        assert_eq!(threshold(18), 1950);
        assert_eq!(threshold(2), 1650);
        assert_eq!(threshold(10), 1789);
    }

    #[test]
    fn singletons_take_precedence_over_ranges() {
        // 19 lies in the evening window and 1 in the night window.
        assert_ne!(threshold(19), EVENING_THRESHOLD);
        assert_ne!(threshold(1), NIGHT_THRESHOLD);
    }

    #[test]
    fn range_edges_are_inclusive() {
        assert_eq!(threshold(17), 1950);
        assert_eq!(threshold(21), 1950);
        assert_eq!(threshold(22), 1789);
        assert_eq!(threshold(0), 1650);
        assert_eq!(threshold(3), 1650);
        assert_eq!(threshold(4), 1789);
        assert_eq!(threshold(16), 1789);
    }

    #[test]
    fn every_hour_maps_into_known_set() {
        let known = [2100, 1500, 1950, 1650, 1789];
        for hour in Hour::all() {
            assert!(known.contains(&select_threshold(hour)), "hour {hour}");
        }
    }

    #[test]
    fn full_day_profile() {
        let expected = [
            1650, 1500, 1650, 1650, 1789, 1789, 1789, 1789, 1789, 1789, 1789, 1789, 1789, 1789,
            1789, 1789, 1789, 1950, 1950, 2100, 1950, 1950, 1789, 1789,
        ];
        assert_eq!(ThresholdTable::default().by_hour(), expected);
    }

    #[test]
    fn flat_table_ignores_hour() {
        let table = ThresholdTable::flat(2500);
        assert!(table.by_hour().iter().all(|&t| t == 2500));
    }

    #[test]
    fn custom_table_keeps_precedence() {
        let table = ThresholdTable {
            peak_hour: 18,
            ..ThresholdTable::default()
        };
        let at = |h| table.select(Hour::new(h).expect("hour should be valid"));
        assert_eq!(at(18), 2100);
        assert_eq!(at(19), 1950);
    }
}
