//! Rule-based NYSE holiday calendar.
//!
//! Deterministic, pure logic: computes the full-day closures of the New York
//! Stock Exchange for a range of years from the holiday rules, plus the
//! handful of unscheduled closures since 1994. Early closes are trading days
//! and not listed.

use crate::domain::calendar::HolidaySet;
use crate::domain::error::SimulatorError;
use crate::domain::period::month_end;
use crate::ports::holiday_port::HolidayCalendarPort;
use chrono::{Datelike, Days, NaiveDate, Weekday};

const SPECIAL_CLOSURES: [(i32, u32, u32); 11] = [
    (1994, 4, 27),  // Nixon funeral
    (2001, 9, 11),  // September 11
    (2001, 9, 12),
    (2001, 9, 13),
    (2001, 9, 14),
    (2004, 6, 11),  // Reagan funeral
    (2007, 1, 2),   // Ford funeral
    (2012, 10, 29), // Hurricane Sandy
    (2012, 10, 30),
    (2018, 12, 5),  // G. H. W. Bush funeral
    (2025, 1, 9),   // Carter funeral
];

pub struct NyseCalendarAdapter {
    first_year: i32,
    last_year: i32,
}

impl NyseCalendarAdapter {
    pub fn new(first_year: i32, last_year: i32) -> Self {
        Self {
            first_year,
            last_year,
        }
    }

    pub fn supports(exchange: &str) -> bool {
        matches!(exchange.to_uppercase().as_str(), "NYSE" | "XNYS")
    }
}

impl Default for NyseCalendarAdapter {
    fn default() -> Self {
        Self::new(1990, 2040)
    }
}

impl HolidayCalendarPort for NyseCalendarAdapter {
    fn holidays_for(&self, exchange: &str) -> Result<HolidaySet, SimulatorError> {
        if !Self::supports(exchange) {
            return Err(SimulatorError::UnknownExchange(exchange.to_string()));
        }
        let mut set = HolidaySet::new();
        for year in self.first_year..=self.last_year {
            set.extend(holidays_in_year(year));
        }
        set.extend(
            SPECIAL_CLOSURES
                .iter()
                .filter(|(y, _, _)| (self.first_year..=self.last_year).contains(y))
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        );
        Ok(set)
    }
}

/// Regular NYSE holidays observed in `year`.
pub fn holidays_in_year(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(10);

    // A Saturday New Year's Day is not moved to the preceding Friday.
    if let Some(new_year) = NaiveDate::from_ymd_opt(year, 1, 1) {
        match new_year.weekday() {
            Weekday::Sat => {}
            Weekday::Sun => days.extend(new_year.checked_add_days(Days::new(1))),
            _ => days.push(new_year),
        }
    }

    if year >= 1998 {
        days.extend(NaiveDate::from_weekday_of_month_opt(year, 1, Weekday::Mon, 3));
    }
    days.extend(NaiveDate::from_weekday_of_month_opt(year, 2, Weekday::Mon, 3));
    days.extend(easter_sunday(year).and_then(|e| e.checked_sub_days(Days::new(2))));
    days.extend(last_weekday_of_month(year, 5, Weekday::Mon));
    if year >= 2022 {
        days.extend(NaiveDate::from_ymd_opt(year, 6, 19).map(observed));
    }
    days.extend(NaiveDate::from_ymd_opt(year, 7, 4).map(observed));
    days.extend(NaiveDate::from_weekday_of_month_opt(year, 9, Weekday::Mon, 1));
    days.extend(NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Thu, 4));
    days.extend(NaiveDate::from_ymd_opt(year, 12, 25).map(observed));

    days.sort();
    days
}

/// Saturday holidays move to Friday, Sunday holidays to Monday.
fn observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.pred_opt().unwrap_or(date),
        Weekday::Sun => date.succ_opt().unwrap_or(date),
        _ => date,
    }
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let end = month_end(year, month);
    let back = (end.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    end.checked_sub_days(Days::new(u64::from(back)))
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
