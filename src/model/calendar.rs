use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

/// A calendar unit the timeline can truncate to, step by, or measure in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeUnit {
    /// Number of months per unit, for the month-based units.
    fn months(self) -> Option<u32> {
        match self {
            TimeUnit::Month => Some(1),
            TimeUnit::Quarter => Some(3),
            TimeUnit::Year => Some(12),
            _ => None,
        }
    }
}

/// Calendar arithmetic used by the layout engine.
///
/// Instants are plain `NaiveDateTime` values; ordering comes from `Ord`.
/// Everything else the engine needs (truncation, stepping, measuring) goes
/// through this trait so the layout code does not care how the calendar is
/// implemented.
pub trait Calendar {
    /// Truncate `at` to the start of the `unit` containing it.
    fn start_of(&self, at: NaiveDateTime, unit: TimeUnit) -> NaiveDateTime;

    /// Move `at` by `amount` units (negative moves backwards).
    fn add(&self, at: NaiveDateTime, amount: i64, unit: TimeUnit) -> NaiveDateTime;

    fn subtract(&self, at: NaiveDateTime, amount: i64, unit: TimeUnit) -> NaiveDateTime {
        self.add(at, amount.saturating_neg(), unit)
    }

    /// Whole `unit`s between `earlier` and `later`, truncated toward zero.
    fn diff(&self, later: NaiveDateTime, earlier: NaiveDateTime, unit: TimeUnit) -> i64;

    /// True when both instants fall in the same `unit` bucket.
    fn is_same(&self, a: NaiveDateTime, b: NaiveDateTime, unit: TimeUnit) -> bool {
        self.start_of(a, unit) == self.start_of(b, unit)
    }
}

/// Proleptic Gregorian calendar with ISO weeks (Monday first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gregorian;

impl Calendar for Gregorian {
    fn start_of(&self, at: NaiveDateTime, unit: TimeUnit) -> NaiveDateTime {
        let date = at.date();
        let day = match unit {
            TimeUnit::Hour => {
                let time = NaiveTime::from_hms_opt(at.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
                return date.and_time(time);
            }
            TimeUnit::Day => date,
            TimeUnit::Week => {
                let back = date.weekday().num_days_from_monday() as u64;
                date.checked_sub_days(chrono::Days::new(back)).unwrap_or(date)
            }
            TimeUnit::Month => date.with_day(1).unwrap_or(date),
            TimeUnit::Quarter => {
                let month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
            }
            TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        };
        day.and_time(NaiveTime::MIN)
    }

    fn add(&self, at: NaiveDateTime, amount: i64, unit: TimeUnit) -> NaiveDateTime {
        let saturated = if amount < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        };

        if let Some(per_unit) = unit.months() {
            let months = amount
                .unsigned_abs()
                .saturating_mul(per_unit as u64)
                .min(u32::MAX as u64) as u32;
            let moved = if amount < 0 {
                at.checked_sub_months(Months::new(months))
            } else {
                at.checked_add_months(Months::new(months))
            };
            return moved.unwrap_or(saturated);
        }

        let delta = match unit {
            TimeUnit::Hour => TimeDelta::try_hours(amount),
            TimeUnit::Day => TimeDelta::try_days(amount),
            TimeUnit::Week => TimeDelta::try_weeks(amount),
            _ => None,
        };
        delta
            .and_then(|d| at.checked_add_signed(d))
            .unwrap_or(saturated)
    }

    fn diff(&self, later: NaiveDateTime, earlier: NaiveDateTime, unit: TimeUnit) -> i64 {
        let delta = later - earlier;
        match unit {
            TimeUnit::Hour => delta.num_hours(),
            TimeUnit::Day => delta.num_days(),
            TimeUnit::Week => delta.num_weeks(),
            TimeUnit::Month | TimeUnit::Quarter | TimeUnit::Year => {
                let months = month_diff(later, earlier);
                months / unit.months().unwrap_or(1) as i64
            }
        }
    }
}

/// Whole calendar months from `earlier` to `later`, truncated toward zero.
fn month_diff(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    let mut months = (later.year() as i64 - earlier.year() as i64) * 12
        + (later.month() as i64 - earlier.month() as i64);

    // Step back one month when the day/time of `later` hasn't reached the anchor yet.
    let anchor = Gregorian.add(earlier, months, TimeUnit::Month);
    if months > 0 && anchor > later {
        months -= 1;
    } else if months < 0 && anchor < later {
        months += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-01-03 is a Wednesday.
        assert_eq!(Gregorian.start_of(at(2024, 1, 3), TimeUnit::Week), at(2024, 1, 1));
        // 2023-12-31 is a Sunday.
        assert_eq!(Gregorian.start_of(at(2023, 12, 31), TimeUnit::Week), at(2023, 12, 25));
    }

    #[test]
    fn start_of_truncates_time_and_coarse_units() {
        let t = at(2024, 5, 17).with_hour(13).unwrap().with_minute(42).unwrap();
        assert_eq!(Gregorian.start_of(t, TimeUnit::Hour), at(2024, 5, 17).with_hour(13).unwrap());
        assert_eq!(Gregorian.start_of(t, TimeUnit::Day), at(2024, 5, 17));
        assert_eq!(Gregorian.start_of(t, TimeUnit::Month), at(2024, 5, 1));
        assert_eq!(Gregorian.start_of(t, TimeUnit::Quarter), at(2024, 4, 1));
        assert_eq!(Gregorian.start_of(t, TimeUnit::Year), at(2024, 1, 1));
    }

    #[test]
    fn adding_months_clamps_to_month_end() {
        assert_eq!(Gregorian.add(at(2024, 1, 31), 1, TimeUnit::Month), at(2024, 2, 29));
        assert_eq!(Gregorian.add(at(2024, 1, 15), 1, TimeUnit::Quarter), at(2024, 4, 15));
        assert_eq!(Gregorian.subtract(at(2024, 3, 1), 1, TimeUnit::Year), at(2023, 3, 1));
        assert_eq!(Gregorian.subtract(at(2024, 1, 5), 2, TimeUnit::Week), at(2023, 12, 22));
    }

    #[test]
    fn diff_truncates_toward_zero() {
        assert_eq!(Gregorian.diff(at(2024, 2, 1), at(2024, 1, 1), TimeUnit::Day), 31);
        assert_eq!(Gregorian.diff(at(2024, 1, 2), at(2024, 1, 1), TimeUnit::Hour), 24);
        assert_eq!(Gregorian.diff(at(2024, 3, 14), at(2024, 1, 15), TimeUnit::Month), 1);
        assert_eq!(Gregorian.diff(at(2024, 3, 15), at(2024, 1, 15), TimeUnit::Month), 2);
        assert_eq!(Gregorian.diff(at(2024, 1, 15), at(2024, 3, 15), TimeUnit::Month), -2);
        assert_eq!(Gregorian.diff(at(2025, 1, 1), at(2024, 1, 1), TimeUnit::Quarter), 4);
    }

    #[test]
    fn same_day_ignores_time() {
        let morning = at(2024, 6, 1).with_hour(8).unwrap();
        let evening = at(2024, 6, 1).with_hour(20).unwrap();
        assert!(Gregorian.is_same(morning, evening, TimeUnit::Day));
        assert!(!Gregorian.is_same(morning, at(2024, 6, 2), TimeUnit::Day));
    }
}
