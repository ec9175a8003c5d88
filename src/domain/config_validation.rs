//! Configuration validation.
//!
//! Checks every configured field for format and range before a simulation
//! runs. Dates and the contribution may also come from the command line, so
//! they are only checked when present.

use crate::domain::error::SimulatorError;
use crate::domain::simulation::RateConversionPolicy;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    validate_dates(config)?;
    validate_contribution_amount(config)?;
    validate_rate_policy(config)?;
    validate_min_years(config)?;
    validate_contribution_rule(config)?;
    validate_market(config)?;
    validate_bonus_table(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SimulatorError {
    SimulatorError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn parse_date(value: &str, section: &str, key: &str) -> Result<NaiveDate, SimulatorError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(section, key, "invalid date format (expected YYYY-MM-DD)"))
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    for key in ["start_date", "end_date"] {
        if let Some(s) = config.get_string("simulation", key) {
            parse_date(&s, "simulation", key)?;
        }
    }
    Ok(())
}

fn validate_contribution_amount(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    if config.get_string("simulation", "monthly_contribution").is_some() {
        let value = config.get_double("simulation", "monthly_contribution", f64::NAN);
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(
                "simulation",
                "monthly_contribution",
                "monthly_contribution must be a positive number",
            ));
        }
    }
    Ok(())
}

fn validate_rate_policy(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    if let Some(s) = config.get_string("simulation", "rate_policy") {
        s.parse::<RateConversionPolicy>()
            .map_err(|reason| invalid("simulation", "rate_policy", reason))?;
    }
    Ok(())
}

fn validate_min_years(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    if config.get_string("simulation", "min_years").is_some() {
        let value = config.get_int("simulation", "min_years", -1);
        if !(0..=100).contains(&value) {
            return Err(invalid(
                "simulation",
                "min_years",
                "min_years must be a whole number between 0 and 100",
            ));
        }
    }
    Ok(())
}

fn validate_contribution_rule(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    let mode = config
        .get_string("contribution", "mode")
        .unwrap_or_else(|| "free".to_string())
        .to_lowercase();

    match mode.as_str() {
        "free" => {
            for key in ["min", "max", "step"] {
                if config.get_string("contribution", key).is_some()
                    && !config.get_double("contribution", key, f64::NAN).is_finite()
                {
                    return Err(invalid(
                        "contribution",
                        key,
                        format!("{key} must be a number"),
                    ));
                }
            }
            let min = config.get_double("contribution", "min", 2000.0);
            let max = config.get_double("contribution", "max", 20_000.0);
            let step = config.get_double("contribution", "step", 1000.0);
            if min <= 0.0 {
                return Err(invalid("contribution", "min", "min must be positive"));
            }
            if max < min {
                return Err(invalid("contribution", "max", "max must not be below min"));
            }
            if step < 0.0 {
                return Err(invalid("contribution", "step", "step must be non-negative"));
            }
            Ok(())
        }
        "tiered" => {
            if let Some(tiers) = config.get_string("contribution", "tiers") {
                parse_tiers(&tiers)?;
            }
            Ok(())
        }
        other => Err(invalid(
            "contribution",
            "mode",
            format!("unknown mode '{other}' (expected free or tiered)"),
        )),
    }
}

pub fn parse_tiers(input: &str) -> Result<Vec<u32>, SimulatorError> {
    let mut tiers = Vec::new();
    for token in input.split(',') {
        let amount: u32 = token.trim().parse().map_err(|_| {
            invalid(
                "contribution",
                "tiers",
                format!("'{}' is not a whole positive amount", token.trim()),
            )
        })?;
        if amount == 0 {
            return Err(invalid("contribution", "tiers", "tiers must be positive"));
        }
        if !tiers.contains(&amount) {
            tiers.push(amount);
        }
    }
    tiers.sort_unstable();
    Ok(tiers)
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    for key in ["index_symbol", "rate_symbol", "exchange"] {
        if let Some(s) = config.get_string("market", key) {
            if s.chars().any(char::is_whitespace) {
                return Err(invalid("market", key, "value must not contain whitespace"));
            }
        }
    }
    Ok(())
}

fn validate_bonus_table(config: &dyn ConfigPort) -> Result<(), SimulatorError> {
    for key in config.section_keys("pension_bonus") {
        if key.parse::<u32>().is_err() {
            return Err(invalid(
                "pension_bonus",
                &key,
                "tier must be a whole positive amount",
            ));
        }
        let bonus = config.get_double("pension_bonus", &key, f64::NAN);
        if !bonus.is_finite() || bonus < 0.0 {
            return Err(invalid(
                "pension_bonus",
                &key,
                "bonus must be a non-negative number",
            ));
        }
    }
    Ok(())
}
