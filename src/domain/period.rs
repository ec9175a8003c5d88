//! Calendar-month counting for investment periods.
//!
//! Both boundary months count as full months regardless of day-of-month, so a
//! period from 15 January to 20 January is one month and a period from
//! 31 January to 1 March is three. This calendar granularity is used for the
//! number of contributions only; elapsed time for annualized returns is
//! measured in days (see [`crate::domain::performance`]).

use chrono::{Datelike, Months, NaiveDate};

/// Inclusive number of calendar months touched by `[start, end]`, at least 1.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
    months.max(1) as u32
}

/// `(year, month)` keys of every month counted by [`months_between`].
pub fn month_keys(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let count = months_between(start, end);
    let mut keys = Vec::with_capacity(count as usize);
    let (mut year, mut month) = (start.year(), start.month());
    for _ in 0..count {
        keys.push((year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    keys
}

/// `date` shifted by `n` calendar months, clamped to the end of the target
/// month (31 January + 1 month = 29 February in a leap year).
pub fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_add_months(Months::new(n)).unwrap_or(NaiveDate::MAX)
}

/// Last day of the given month.
pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
