//! Monthly return factors from daily closing prices.
//!
//! The factor for a month is the product of `close_i / close_{i-1}` over every
//! observation dated in that month. The day-over-day change of the first
//! observation in the window is undefined and counts as neutral; changes that
//! straddle a month boundary belong to the later month.

use crate::domain::calendar::InvestmentPeriod;
use crate::domain::error::SimulatorError;
use crate::domain::period::{month_keys, months_between};
use crate::domain::series::PriceSeries;
use chrono::Datelike;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MonthlyFactor {
    pub year: i32,
    pub month: u32,
    pub factor: f64,
}

/// One positive multiplicative factor per calendar month of a period.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReturnFactors {
    months: Vec<MonthlyFactor>,
}

impl MonthlyReturnFactors {
    /// Consecutive factors starting at `(year, month)`.
    pub fn from_factors(year: i32, month: u32, factors: &[f64]) -> Self {
        let mut months = Vec::with_capacity(factors.len());
        let (mut y, mut m) = (year, month);
        for &factor in factors {
            months.push(MonthlyFactor {
                year: y,
                month: m,
                factor,
            });
            if m == 12 {
                y += 1;
                m = 1;
            } else {
                m += 1;
            }
        }
        Self { months }
    }

    pub fn months(&self) -> &[MonthlyFactor] {
        &self.months
    }

    pub fn factors(&self) -> impl Iterator<Item = f64> + '_ {
        self.months.iter().map(|m| m.factor)
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

pub fn build_monthly_factors(
    prices: &PriceSeries,
    period: &InvestmentPeriod,
) -> Result<MonthlyReturnFactors, SimulatorError> {
    let keys = month_keys(period.start(), period.end());
    let need = months_between(period.start(), period.end()) as usize;
    let window = prices.window(period.start(), period.end());

    for p in window {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(SimulatorError::InvalidPrice {
                date: p.date,
                value: p.value,
            });
        }
    }

    let (first, last) = match (window.first(), window.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            return Err(SimulatorError::InsufficientData {
                symbol: prices.symbol().to_string(),
                have: 0,
                need,
            });
        }
    };

    let first_key = (first.date.year(), first.date.month());
    let last_key = (last.date.year(), last.date.month());
    if first_key != keys[0] || last_key != keys[need - 1] {
        let have = months_between(first.date, last.date) as usize;
        return Err(SimulatorError::InsufficientData {
            symbol: prices.symbol().to_string(),
            have: have.min(need.saturating_sub(1)),
            need,
        });
    }

    let mut products: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    products.insert(first_key, 1.0);
    for pair in window.windows(2) {
        let key = (pair[1].date.year(), pair[1].date.month());
        *products.entry(key).or_insert(1.0) *= pair[1].value / pair[0].value;
    }

    let mut months = Vec::with_capacity(need);
    for (year, month) in keys {
        let factor = products
            .get(&(year, month))
            .copied()
            .ok_or(SimulatorError::EmptyMonth { year, month })?;
        months.push(MonthlyFactor {
            year,
            month,
            factor,
        });
    }

    log::debug!(
        "built {} monthly factors for {} from {} observations",
        months.len(),
        prices.symbol(),
        window.len()
    );
    Ok(MonthlyReturnFactors { months })
}
