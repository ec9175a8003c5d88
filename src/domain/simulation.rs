//! Monthly contribution compounding loop.
//!
//! Each month the contribution is added first and the month's return factor
//! is applied afterwards, including the first and the last month. The
//! contribution is converted into the index currency at the entry rate; the
//! [`RateConversionPolicy`] decides the rate used to value the accumulated
//! holding back in the contribution currency.

use crate::domain::calendar::InvestmentPeriod;
use crate::domain::error::{SimulatorError, ValidationError};
use crate::domain::period::add_months;
use crate::domain::returns::MonthlyReturnFactors;
use crate::domain::series::ExchangeRateSeries;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateConversionPolicy {
    /// Convert and value every month at the period-start rate.
    #[default]
    FixAtEntry,
    /// Value every month at the period-end rate.
    FixAtExit,
    /// Value each month at the rate on or before that month's anchor date.
    MonthlyRepricing,
}

impl fmt::Display for RateConversionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateConversionPolicy::FixAtEntry => write!(f, "fix_at_entry"),
            RateConversionPolicy::FixAtExit => write!(f, "fix_at_exit"),
            RateConversionPolicy::MonthlyRepricing => write!(f, "monthly_repricing"),
        }
    }
}

impl FromStr for RateConversionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fix_at_entry" | "entry" => Ok(RateConversionPolicy::FixAtEntry),
            "fix_at_exit" | "exit" => Ok(RateConversionPolicy::FixAtExit),
            "monthly_repricing" | "monthly" => Ok(RateConversionPolicy::MonthlyRepricing),
            other => Err(format!(
                "unknown rate policy '{other}' (expected fix_at_entry, fix_at_exit or monthly_repricing)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationInput {
    pub period: InvestmentPeriod,
    /// Amount contributed each month, in the target currency.
    pub monthly_contribution: f64,
    pub policy: RateConversionPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MonthlyValue {
    pub year: i32,
    pub month: u32,
    /// Holding value in the target currency at the end of the month.
    pub value: f64,
    /// Cumulative amount contributed so far, in the target currency.
    pub invested: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SimulationResult {
    pub final_value: f64,
    pub total_invested: f64,
    pub profit_loss_amount: f64,
    pub profit_loss_percent: f64,
    pub duration_months: u32,
    pub monthly_value_series: Vec<MonthlyValue>,
    pub policy: RateConversionPolicy,
    pub contribution_rate: f64,
    pub exit_rate: Option<f64>,
}

impl SimulationResult {
    pub fn contributed_series(&self) -> impl Iterator<Item = f64> + '_ {
        self.monthly_value_series.iter().map(|m| m.invested)
    }
}

fn checked_rate(rate: Option<f64>, date: NaiveDate) -> Result<f64, SimulatorError> {
    match rate {
        Some(r) if r.is_finite() && r > 0.0 => Ok(r),
        _ => Err(SimulatorError::MissingRate { date }),
    }
}

fn entry_rate(rates: &ExchangeRateSeries, start: NaiveDate) -> Result<f64, SimulatorError> {
    let rate = rates.value_on(start).or_else(|| {
        log::warn!(
            "no {} rate on {}, using first observation",
            rates.symbol(),
            start
        );
        rates.first().map(|p| p.value)
    });
    checked_rate(rate, start)
}

fn exit_rate(rates: &ExchangeRateSeries, end: NaiveDate) -> Result<f64, SimulatorError> {
    let rate = rates.value_on(end).or_else(|| {
        log::warn!(
            "no {} rate on {}, using last observation",
            rates.symbol(),
            end
        );
        rates.last().map(|p| p.value)
    });
    checked_rate(rate, end)
}

pub fn simulate(
    input: &SimulationInput,
    factors: &MonthlyReturnFactors,
    rates: &ExchangeRateSeries,
) -> Result<SimulationResult, SimulatorError> {
    let contribution = input.monthly_contribution;
    if !contribution.is_finite() || contribution <= 0.0 {
        return Err(ValidationError::ContributionNotAllowed {
            amount: contribution,
        }
        .into());
    }

    let start = input.period.start();
    let duration = input.period.months();
    if factors.len() != duration as usize {
        return Err(SimulatorError::InsufficientData {
            symbol: "monthly return factors".to_string(),
            have: factors.len(),
            need: duration as usize,
        });
    }

    let contribution_rate = entry_rate(rates, start)?;
    let contribution_source = contribution / contribution_rate;
    let fixed_rate = match input.policy {
        RateConversionPolicy::FixAtEntry => Some(contribution_rate),
        RateConversionPolicy::FixAtExit => Some(exit_rate(rates, input.period.end())?),
        RateConversionPolicy::MonthlyRepricing => None,
    };
    let exit = match input.policy {
        RateConversionPolicy::FixAtExit => fixed_rate,
        _ => None,
    };

    let mut accumulated = 0.0_f64;
    let mut series = Vec::with_capacity(duration as usize);

    for (i, month) in factors.months().iter().enumerate() {
        accumulated += contribution_source;
        accumulated *= month.factor;

        let rate = match fixed_rate {
            Some(r) => r,
            None => {
                let anchor = add_months(start, i as u32);
                checked_rate(rates.value_as_of(anchor), anchor)?
            }
        };

        let value = accumulated * rate;
        let invested = contribution * (i + 1) as f64;
        log::debug!(
            "{}-{:02}: holding {:.4} at rate {:.4} = {:.2}",
            month.year,
            month.month,
            accumulated,
            rate,
            value
        );
        series.push(MonthlyValue {
            year: month.year,
            month: month.month,
            value,
            invested,
        });
    }

    let total_invested = contribution * duration as f64;
    let final_value = series.last().map(|m| m.value).unwrap_or(0.0);
    let profit_loss_amount = final_value - total_invested;
    let profit_loss_percent = profit_loss_amount / total_invested * 100.0;

    Ok(SimulationResult {
        final_value,
        total_invested,
        profit_loss_amount,
        profit_loss_percent,
        duration_months: duration,
        monthly_value_series: series,
        policy: input.policy,
        contribution_rate,
        exit_rate: exit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::{validate_period, HolidaySet};
    use crate::domain::series::TimeSeries;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn three_month_input(policy: RateConversionPolicy) -> SimulationInput {
        SimulationInput {
            period: validate_period(d(2024, 1, 2), d(2024, 3, 28), 0, &HolidaySet::new())
                .unwrap(),
            monthly_contribution: 10_000.0,
            policy,
        }
    }

    fn scenario_factors() -> MonthlyReturnFactors {
        MonthlyReturnFactors::from_factors(2024, 1, &[1.05, 0.98, 1.02])
    }

    #[test]
    fn fixed_entry_scenario() {
        let rates = TimeSeries::from_pairs("CZK=X", vec![(d(2024, 1, 2), 25.0)]).unwrap();
        let result = simulate(
            &three_month_input(RateConversionPolicy::FixAtEntry),
            &scenario_factors(),
            &rates,
        )
        .unwrap();

        let values: Vec<f64> = result.monthly_value_series.iter().map(|m| m.value).collect();
        assert_relative_eq!(values[0], 10_500.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 20_090.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 30_691.8, epsilon = 1e-9);
        assert_relative_eq!(result.total_invested, 30_000.0);
        assert_relative_eq!(result.profit_loss_amount, 691.8, epsilon = 1e-9);
        assert_relative_eq!(result.profit_loss_percent, 2.306, epsilon = 1e-9);
        assert_eq!(result.duration_months, 3);
        assert_eq!(result.exit_rate, None);
    }

    #[test]
    fn fixed_entry_ignores_later_rates() {
        let rates = TimeSeries::from_pairs(
            "CZK=X",
            vec![(d(2024, 1, 2), 25.0), (d(2024, 2, 1), 22.0), (d(2024, 3, 1), 20.0)],
        )
        .unwrap();
        let factors = MonthlyReturnFactors::from_factors(2024, 1, &[1.0, 1.0, 1.0]);
        let result = simulate(
            &three_month_input(RateConversionPolicy::FixAtEntry),
            &factors,
            &rates,
        )
        .unwrap();

        let values: Vec<f64> = result.monthly_value_series.iter().map(|m| m.value).collect();
        assert_relative_eq!(values[0], 10_000.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 20_000.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 30_000.0, epsilon = 1e-9);
        assert_relative_eq!(result.final_value, result.total_invested, epsilon = 1e-9);
        assert_relative_eq!(result.profit_loss_amount, 0.0, epsilon = 1e-9);
        assert_eq!(result.exit_rate, None);
    }

    #[test]
    fn monthly_repricing_revalues_at_monthly_rate() {
        let rates = TimeSeries::from_pairs(
            "CZK=X",
            vec![(d(2024, 1, 2), 25.0), (d(2024, 2, 1), 20.0), (d(2024, 3, 1), 30.0)],
        )
        .unwrap();
        let factors = MonthlyReturnFactors::from_factors(2024, 1, &[1.0, 1.0, 1.0]);
        let result = simulate(
            &three_month_input(RateConversionPolicy::MonthlyRepricing),
            &factors,
            &rates,
        )
        .unwrap();

        // 400 USD per month bought at 25
        let values: Vec<f64> = result.monthly_value_series.iter().map(|m| m.value).collect();
        assert_relative_eq!(values[0], 400.0 * 25.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 800.0 * 20.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 1200.0 * 30.0, epsilon = 1e-9);
        assert_relative_eq!(result.contribution_rate, 25.0);
    }

    #[test]
    fn fixed_exit_uses_end_rate_for_every_month() {
        let rates = TimeSeries::from_pairs(
            "CZK=X",
            vec![(d(2024, 1, 2), 25.0), (d(2024, 3, 28), 20.0)],
        )
        .unwrap();
        let result = simulate(
            &three_month_input(RateConversionPolicy::FixAtExit),
            &scenario_factors(),
            &rates,
        )
        .unwrap();

        let values: Vec<f64> = result.monthly_value_series.iter().map(|m| m.value).collect();
        assert_relative_eq!(values[0], 420.0 * 20.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 1227.672 * 20.0, epsilon = 1e-9);
        assert_eq!(result.exit_rate, Some(20.0));
    }

    #[test]
    fn policies_differ_when_rate_moves() {
        let rates = TimeSeries::from_pairs(
            "CZK=X",
            vec![(d(2024, 1, 2), 25.0), (d(2024, 3, 28), 20.0)],
        )
        .unwrap();
        let entry = simulate(
            &three_month_input(RateConversionPolicy::FixAtEntry),
            &scenario_factors(),
            &rates,
        )
        .unwrap();
        let exit = simulate(
            &three_month_input(RateConversionPolicy::FixAtExit),
            &scenario_factors(),
            &rates,
        )
        .unwrap();
        assert_relative_eq!(entry.final_value, 30_691.8, epsilon = 1e-9);
        assert_relative_eq!(exit.final_value, 24_553.44, epsilon = 1e-9);
    }

    #[test]
    fn missing_start_rate_falls_back_to_first_observation() {
        let rates = TimeSeries::from_pairs("CZK=X", vec![(d(2024, 1, 3), 25.0)]).unwrap();
        let result = simulate(
            &three_month_input(RateConversionPolicy::FixAtEntry),
            &scenario_factors(),
            &rates,
        )
        .unwrap();
        assert_relative_eq!(result.contribution_rate, 25.0);
    }

    #[test]
    fn unit_factors_break_even_at_constant_rate() {
        let rates = TimeSeries::from_pairs("CZK=X", vec![(d(2024, 1, 2), 23.4)]).unwrap();
        let factors = MonthlyReturnFactors::from_factors(2024, 1, &[1.0, 1.0, 1.0]);
        for policy in [
            RateConversionPolicy::FixAtEntry,
            RateConversionPolicy::FixAtExit,
            RateConversionPolicy::MonthlyRepricing,
        ] {
            let result = simulate(&three_month_input(policy), &factors, &rates).unwrap();
            assert_relative_eq!(result.final_value, result.total_invested, epsilon = 1e-6);
            assert_relative_eq!(result.profit_loss_amount, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn empty_rate_series_is_missing_rate() {
        let rates = TimeSeries::new("CZK=X", vec![]).unwrap();
        let err = simulate(
            &three_month_input(RateConversionPolicy::FixAtEntry),
            &scenario_factors(),
            &rates,
        )
        .unwrap_err();
        assert!(matches!(err, SimulatorError::MissingRate { date } if date == d(2024, 1, 2)));
    }

    #[test]
    fn zero_rate_is_missing_rate() {
        let rates = TimeSeries::from_pairs("CZK=X", vec![(d(2024, 1, 2), 0.0)]).unwrap();
        let err = simulate(
            &three_month_input(RateConversionPolicy::FixAtExit),
            &scenario_factors(),
            &rates,
        )
        .unwrap_err();
        assert!(matches!(err, SimulatorError::MissingRate { .. }));
    }

    #[test]
    fn factor_count_must_match_duration() {
        let rates = TimeSeries::from_pairs("CZK=X", vec![(d(2024, 1, 2), 25.0)]).unwrap();
        let factors = MonthlyReturnFactors::from_factors(2024, 1, &[1.05, 0.98]);
        let err = simulate(
            &three_month_input(RateConversionPolicy::FixAtEntry),
            &factors,
            &rates,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimulatorError::InsufficientData { have: 2, need: 3, .. }
        ));
    }

    #[test]
    fn non_positive_contribution_rejected() {
        let rates = TimeSeries::from_pairs("CZK=X", vec![(d(2024, 1, 2), 25.0)]).unwrap();
        let mut input = three_month_input(RateConversionPolicy::FixAtEntry);
        input.monthly_contribution = 0.0;
        let err = simulate(&input, &scenario_factors(), &rates).unwrap_err();
        assert!(matches!(err, SimulatorError::Validation(_)));
    }

    #[test]
    fn contributed_series_is_cumulative() {
        let rates = TimeSeries::from_pairs("CZK=X", vec![(d(2024, 1, 2), 25.0)]).unwrap();
        let result = simulate(
            &three_month_input(RateConversionPolicy::FixAtEntry),
            &scenario_factors(),
            &rates,
        )
        .unwrap();
        let invested: Vec<f64> = result.contributed_series().collect();
        assert_eq!(invested, vec![10_000.0, 20_000.0, 30_000.0]);
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!(
            "fix_at_exit".parse::<RateConversionPolicy>(),
            Ok(RateConversionPolicy::FixAtExit)
        );
        assert_eq!(
            " Entry ".parse::<RateConversionPolicy>(),
            Ok(RateConversionPolicy::FixAtEntry)
        );
        assert_eq!(
            "monthly".parse::<RateConversionPolicy>(),
            Ok(RateConversionPolicy::MonthlyRepricing)
        );
        assert!("spot".parse::<RateConversionPolicy>().is_err());
        assert_eq!(RateConversionPolicy::FixAtExit.to_string(), "fix_at_exit");
        assert_eq!(
            RateConversionPolicy::MonthlyRepricing.to_string(),
            "monthly_repricing"
        );
    }
}
