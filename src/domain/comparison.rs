//! One simulation request: validate, fetch, simulate, summarize, compare.

use crate::domain::calendar::{validate_period, InvestmentPeriod};
use crate::domain::config::{MarketLabels, SimulationConfig};
use crate::domain::error::SimulatorError;
use crate::domain::pension::{self, PensionResult};
use crate::domain::performance::{summarize, PerformanceSummary};
use crate::domain::returns::build_monthly_factors;
use crate::domain::series::{SeriesPoint, TimeSeries};
use crate::domain::simulation::{simulate, SimulationInput, SimulationResult};
use crate::ports::holiday_port::HolidayCalendarPort;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Debug, Clone, serde::Serialize)]
pub struct Comparison {
    pub period: InvestmentPeriod,
    pub monthly_contribution: f64,
    pub market: MarketLabels,
    pub simulation: SimulationResult,
    pub summary: PerformanceSummary,
    pub pension: Option<PensionResult>,
    /// Index closes within the period.
    pub price_history: Vec<SeriesPoint>,
}

/// Period validation and contribution check, without touching market data.
pub fn validate_request(
    holidays: &dyn HolidayCalendarPort,
    config: &SimulationConfig,
) -> Result<InvestmentPeriod, SimulatorError> {
    let holiday_set = holidays.holidays_for(&config.market.exchange)?;
    let period = validate_period(
        config.start_date,
        config.end_date,
        config.min_years,
        &holiday_set,
    )?;
    config
        .contribution_rule
        .validate(config.monthly_contribution)?;
    Ok(period)
}

fn fetch_non_empty(
    market: &dyn MarketDataPort,
    symbol: &str,
    period: &InvestmentPeriod,
) -> Result<TimeSeries, SimulatorError> {
    let series = market.fetch(symbol, period.start(), period.fetch_end_exclusive())?;
    if series.is_empty() {
        return Err(SimulatorError::DataUnavailable {
            symbol: symbol.to_string(),
            start: period.start(),
            end: period.end(),
        });
    }
    log::info!("fetched {} observations for {}", series.len(), symbol);
    Ok(series)
}

pub fn run_comparison(
    market: &dyn MarketDataPort,
    holidays: &dyn HolidayCalendarPort,
    config: &SimulationConfig,
) -> Result<Comparison, SimulatorError> {
    let period = validate_request(holidays, config)?;
    log::info!(
        "simulating {} per month from {} to {} ({} months, {})",
        config.monthly_contribution,
        period.start(),
        period.end(),
        period.months(),
        config.policy
    );

    let prices = fetch_non_empty(market, &config.market.index_symbol, &period)?;
    let rates = fetch_non_empty(market, &config.market.rate_symbol, &period)?;

    let factors = build_monthly_factors(&prices, &period)?;
    let input = SimulationInput {
        period,
        monthly_contribution: config.monthly_contribution,
        policy: config.policy,
    };
    let simulation = simulate(&input, &factors, &rates)?;
    let summary = summarize(&simulation, &period);
    log::info!(
        "final value {:.2}, invested {:.2}, profit/loss {:.2}%",
        summary.final_value,
        summary.total_invested,
        summary.profit_loss_percent
    );

    let pension = config.pension.as_ref().map(|table| {
        let result = pension::compare(config.monthly_contribution, period.months(), table);
        log::info!(
            "pension final value {:.2} (bonus {:.2})",
            result.final_value,
            result.total_bonus
        );
        result
    });

    let price_history = prices.window(period.start(), period.end()).to_vec();

    Ok(Comparison {
        period,
        monthly_contribution: config.monthly_contribution,
        market: config.market.clone(),
        simulation,
        summary,
        pension,
        price_history,
    })
}
