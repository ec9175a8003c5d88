//! Simulation request parameters.

use crate::domain::config_validation::{parse_date, parse_tiers};
use crate::domain::contribution::{ContributionRule, DEFAULT_TIERS};
use crate::domain::error::SimulatorError;
use crate::domain::pension::StateContributionTable;
use crate::domain::simulation::RateConversionPolicy;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

/// Symbols and currency codes of the single supported pair.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarketLabels {
    pub index_symbol: String,
    pub rate_symbol: String,
    pub exchange: String,
    pub source_currency: String,
    pub target_currency: String,
}

impl Default for MarketLabels {
    fn default() -> Self {
        Self {
            index_symbol: "^GSPC".into(),
            rate_symbol: "CZK=X".into(),
            exchange: "NYSE".into(),
            source_currency: "USD".into(),
            target_currency: "CZK".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_contribution: f64,
    pub policy: RateConversionPolicy,
    pub min_years: u32,
    pub contribution_rule: ContributionRule,
    pub market: MarketLabels,
    /// Bonus table when the pension comparison is enabled.
    pub pension: Option<StateContributionTable>,
}

/// Values given on the command line; they take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub monthly_contribution: Option<f64>,
    pub policy: Option<RateConversionPolicy>,
    pub pension: Option<bool>,
}

fn required_date(
    config: &dyn ConfigPort,
    key: &str,
    over: Option<NaiveDate>,
) -> Result<NaiveDate, SimulatorError> {
    if let Some(d) = over {
        return Ok(d);
    }
    let s = config
        .get_string("simulation", key)
        .ok_or_else(|| SimulatorError::ConfigMissing {
            section: "simulation".into(),
            key: key.into(),
        })?;
    parse_date(&s, "simulation", key)
}

pub fn build_contribution_rule(config: &dyn ConfigPort) -> Result<ContributionRule, SimulatorError> {
    let mode = config
        .get_string("contribution", "mode")
        .unwrap_or_else(|| "free".to_string())
        .to_lowercase();
    if mode == "tiered" {
        let tiers = match config.get_string("contribution", "tiers") {
            Some(s) => parse_tiers(&s)?,
            None => DEFAULT_TIERS.to_vec(),
        };
        Ok(ContributionRule::Tiered(tiers))
    } else {
        Ok(ContributionRule::FreeForm {
            min: config.get_double("contribution", "min", 2000.0),
            max: config.get_double("contribution", "max", 20_000.0),
            step: config.get_double("contribution", "step", 1000.0),
        })
    }
}

/// The `[pension_bonus]` section, or the default table when it is absent.
pub fn build_bonus_table(config: &dyn ConfigPort) -> StateContributionTable {
    let keys = config.section_keys("pension_bonus");
    if keys.is_empty() {
        return StateContributionTable::default();
    }
    keys.iter()
        .filter_map(|k| {
            let tier = k.parse::<u32>().ok()?;
            Some((tier, config.get_double("pension_bonus", k, 0.0)))
        })
        .collect()
}

pub fn build_market_labels(config: &dyn ConfigPort) -> MarketLabels {
    let defaults = MarketLabels::default();
    let get = |key: &str, default: String| config.get_string("market", key).unwrap_or(default);
    MarketLabels {
        index_symbol: get("index_symbol", defaults.index_symbol),
        rate_symbol: get("rate_symbol", defaults.rate_symbol),
        exchange: get("exchange", defaults.exchange),
        source_currency: get("source_currency", defaults.source_currency),
        target_currency: get("target_currency", defaults.target_currency),
    }
}

pub fn build_simulation_config(
    config: &dyn ConfigPort,
    overrides: &ConfigOverrides,
) -> Result<SimulationConfig, SimulatorError> {
    let start_date = required_date(config, "start_date", overrides.start_date)?;
    let end_date = required_date(config, "end_date", overrides.end_date)?;

    let monthly_contribution = match overrides.monthly_contribution {
        Some(c) => c,
        None => {
            if config.get_string("simulation", "monthly_contribution").is_none() {
                return Err(SimulatorError::ConfigMissing {
                    section: "simulation".into(),
                    key: "monthly_contribution".into(),
                });
            }
            config.get_double("simulation", "monthly_contribution", 0.0)
        }
    };

    let policy = match overrides.policy {
        Some(p) => p,
        None => match config.get_string("simulation", "rate_policy") {
            Some(s) => s.parse().map_err(|reason| SimulatorError::ConfigInvalid {
                section: "simulation".into(),
                key: "rate_policy".into(),
                reason,
            })?,
            None => RateConversionPolicy::default(),
        },
    };

    let pension_enabled = overrides
        .pension
        .unwrap_or_else(|| config.get_bool("pension", "enabled", false));

    Ok(SimulationConfig {
        start_date,
        end_date,
        monthly_contribution,
        policy,
        min_years: config.get_int("simulation", "min_years", 1).clamp(0, 100) as u32,
        contribution_rule: build_contribution_rule(config)?,
        market: build_market_labels(config),
        pension: pension_enabled.then(|| build_bonus_table(config)),
    })
}
