//! Working-day arithmetic: weekends plus the US federal holiday calendar.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rustc_hash::FxHashSet;

/// Whether a date falls on Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Nth `weekday` of `month` (1-based), e.g. third Monday of January.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// Last Monday of May.
fn memorial_day(year: i32) -> Option<NaiveDate> {
    let may_31 = NaiveDate::from_ymd_opt(year, 5, 31)?;
    let back = may_31.weekday().num_days_from_monday();
    may_31.checked_sub_days(Days::new(u64::from(back)))
}

/// US holidays observed for `year`.
///
/// Fixed-date holidays are taken on their calendar date (no weekend
/// observance shifting).
pub fn us_holidays(year: i32) -> FxHashSet<NaiveDate> {
    [
        NaiveDate::from_ymd_opt(year, 1, 1),
        nth_weekday(year, 1, Weekday::Mon, 3),
        nth_weekday(year, 2, Weekday::Mon, 3),
        memorial_day(year),
        NaiveDate::from_ymd_opt(year, 7, 4),
        nth_weekday(year, 9, Weekday::Mon, 1),
        nth_weekday(year, 10, Weekday::Mon, 2),
        NaiveDate::from_ymd_opt(year, 11, 11),
        nth_weekday(year, 11, Weekday::Thu, 4),
        NaiveDate::from_ymd_opt(year, 12, 25),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Count working days between `start` and `end`, both inclusive.
///
/// Returns 0 when `start > end`. Holidays of every year the span touches are
/// excluded.
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }

    let mut holidays = FxHashSet::default();
    for year in start.year()..=end.year() {
        holidays.extend(us_holidays(year));
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !is_weekend(*day) && !holidays.contains(day))
        .count() as u32
}
