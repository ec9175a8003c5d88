#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use indexgrowth::domain::calendar::HolidaySet;
use indexgrowth::domain::config::{MarketLabels, SimulationConfig};
use indexgrowth::domain::contribution::ContributionRule;
use indexgrowth::domain::error::SimulatorError;
use indexgrowth::domain::series::TimeSeries;
use indexgrowth::domain::simulation::RateConversionPolicy;
use indexgrowth::ports::holiday_port::HolidayCalendarPort;
use indexgrowth::ports::market_data_port::MarketDataPort;
use std::collections::HashMap;
use std::process::ExitCode;

pub const INDEX: &str = "^GSPC";
pub const RATE: &str = "CZK=X";

pub struct MockMarketData {
    pub data: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, points: Vec<(NaiveDate, f64)>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<TimeSeries, SimulatorError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SimulatorError::DataSource {
                reason: reason.clone(),
            });
        }
        let points: Vec<_> = self
            .data
            .get(symbol)
            .map(|p| {
                p.iter()
                    .copied()
                    .filter(|(d, _)| *d >= start && *d < end_exclusive)
                    .collect()
            })
            .unwrap_or_default();
        if points.is_empty() {
            return Err(SimulatorError::DataUnavailable {
                symbol: symbol.to_string(),
                start,
                end: end_exclusive,
            });
        }
        TimeSeries::from_pairs(symbol, points)
    }
}

pub struct MockHolidays {
    pub holidays: HolidaySet,
}

impl MockHolidays {
    pub fn none() -> Self {
        Self {
            holidays: HolidaySet::new(),
        }
    }

    pub fn with(dates: &[NaiveDate]) -> Self {
        Self {
            holidays: dates.iter().copied().collect(),
        }
    }
}

impl HolidayCalendarPort for MockHolidays {
    fn holidays_for(&self, _exchange: &str) -> Result<HolidaySet, SimulatorError> {
        Ok(self.holidays.clone())
    }
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn weekdays(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

pub fn constant_series(start: NaiveDate, end: NaiveDate, value: f64) -> Vec<(NaiveDate, f64)> {
    weekdays(start, end).into_iter().map(|date| (date, value)).collect()
}

/// Observations growing by `daily_factor` per trading day from `first`.
pub fn growing_series(
    start: NaiveDate,
    end: NaiveDate,
    first: f64,
    daily_factor: f64,
) -> Vec<(NaiveDate, f64)> {
    let mut value = first;
    weekdays(start, end)
        .into_iter()
        .map(|date| {
            let point = (date, value);
            value *= daily_factor;
            point
        })
        .collect()
}

pub fn sample_config(start: NaiveDate, end: NaiveDate, contribution: f64) -> SimulationConfig {
    SimulationConfig {
        start_date: start,
        end_date: end,
        monthly_contribution: contribution,
        policy: RateConversionPolicy::FixAtEntry,
        min_years: 1,
        contribution_rule: ContributionRule::default_free_form(),
        market: MarketLabels::default(),
        pension: None,
    }
}

pub fn assert_exit(code: ExitCode, expected: u8) {
    assert_eq!(
        format!("{code:?}"),
        format!("{:?}", ExitCode::from(expected)),
        "unexpected exit code"
    );
}
