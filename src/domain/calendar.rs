//! Trading-day checks and investment period validation.

use crate::domain::error::ValidationError;
use crate::domain::period::months_between;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeSet;

pub const DAYS_PER_YEAR: f64 = 365.25;

/// Exchange holidays (full-day closures).
pub type HolidaySet = BTreeSet<NaiveDate>;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_trading_day(date: NaiveDate, holidays: &HolidaySet) -> bool {
    !is_weekend(date) && !holidays.contains(&date)
}

/// A start/end pair that passed [`validate_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct InvestmentPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl InvestmentPeriod {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of monthly contributions.
    pub fn months(&self) -> u32 {
        months_between(self.start, self.end)
    }

    pub fn elapsed_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn elapsed_years(&self) -> f64 {
        self.elapsed_days() as f64 / DAYS_PER_YEAR
    }

    /// Exclusive upper bound to request from a data provider so that the end
    /// date's own observation is included.
    pub fn fetch_end_exclusive(&self) -> NaiveDate {
        self.end.checked_add_days(Days::new(1)).unwrap_or(self.end)
    }
}

/// Validate a requested period. Checks run in a fixed order and only the
/// first failure is reported: length, ordering, start day, end day.
pub fn validate_period(
    start: NaiveDate,
    end: NaiveDate,
    min_years: u32,
    holidays: &HolidaySet,
) -> Result<InvestmentPeriod, ValidationError> {
    let min_days = 365 * i64::from(min_years);
    if (end - start).num_days() < min_days {
        return Err(ValidationError::PeriodTooShort { min_years });
    }
    if start >= end {
        return Err(ValidationError::InvertedPeriod);
    }
    if !is_trading_day(start, holidays) {
        return Err(ValidationError::StartOnNonTradingDay(start));
    }
    if !is_trading_day(end, holidays) {
        return Err(ValidationError::EndOnNonTradingDay(end));
    }
    Ok(InvestmentPeriod { start, end })
}
