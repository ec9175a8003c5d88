//! Profit/loss and annualized return of a simulation.
//!
//! Annualized growth uses actual elapsed days (`days / 365.25`) while the
//! number of contributions counts calendar months; the two durations differ
//! on purpose.

use crate::domain::calendar::InvestmentPeriod;
use crate::domain::error::SimulatorError;
use crate::domain::simulation::SimulationResult;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PerformanceSummary {
    pub total_invested: f64,
    pub final_value: f64,
    pub profit_loss_amount: f64,
    pub profit_loss_percent: f64,
    pub duration_months: u32,
    pub elapsed_years: f64,
    /// `None` when the annualized return is undefined.
    pub cagr_percent: Option<f64>,
}

pub fn cagr_percent(
    final_value: f64,
    total_invested: f64,
    period: &InvestmentPeriod,
) -> Result<f64, SimulatorError> {
    let years = period.elapsed_years();
    if total_invested <= 0.0 {
        return Err(SimulatorError::DegenerateCagr {
            reason: "total invested is not positive".into(),
        });
    }
    if years <= 0.0 {
        return Err(SimulatorError::DegenerateCagr {
            reason: "elapsed time is not positive".into(),
        });
    }
    let cagr = ((final_value / total_invested).powf(1.0 / years) - 1.0) * 100.0;
    if !cagr.is_finite() {
        return Err(SimulatorError::DegenerateCagr {
            reason: format!("growth ratio {} has no annual rate", final_value / total_invested),
        });
    }
    Ok(cagr)
}

pub fn summarize(result: &SimulationResult, period: &InvestmentPeriod) -> PerformanceSummary {
    let cagr = match cagr_percent(result.final_value, result.total_invested, period) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("{e}");
            None
        }
    };

    PerformanceSummary {
        total_invested: result.total_invested,
        final_value: result.final_value,
        profit_loss_amount: result.profit_loss_amount,
        profit_loss_percent: result.profit_loss_percent,
        duration_months: result.duration_months,
        elapsed_years: period.elapsed_years(),
        cagr_percent: cagr,
    }
}
