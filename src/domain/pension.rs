//! State-supported pension savings: fixed contribution plus a flat monthly
//! state bonus, no market return.

use std::collections::BTreeMap;

/// Allowed whole monthly contribution amount → monthly state bonus.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StateContributionTable {
    bonuses: BTreeMap<u32, f64>,
}

impl StateContributionTable {
    pub fn new(bonuses: BTreeMap<u32, f64>) -> Self {
        Self { bonuses }
    }

    /// Bonus for `contribution`, 0 when the amount is not a listed tier.
    pub fn lookup(&self, contribution: f64) -> f64 {
        if contribution.fract() != 0.0 || contribution < 0.0 || contribution > u32::MAX as f64 {
            return 0.0;
        }
        self.bonuses
            .get(&(contribution as u32))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn tiers(&self) -> impl Iterator<Item = u32> + '_ {
        self.bonuses.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }
}

impl Default for StateContributionTable {
    /// 90 plus 20 % of the amount above 300, capped at 230 from 1000 upward.
    fn default() -> Self {
        let bonuses = [
            (300, 90.0),
            (500, 130.0),
            (1000, 230.0),
            (1500, 230.0),
            (1700, 230.0),
            (2000, 230.0),
        ]
        .into_iter()
        .collect();
        Self { bonuses }
    }
}

impl FromIterator<(u32, f64)> for StateContributionTable {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PensionResult {
    pub final_value: f64,
    /// Own contributions only, excluding the state bonus.
    pub total_contributed: f64,
    pub total_bonus: f64,
    pub monthly_bonus: f64,
    pub monthly_value_series: Vec<f64>,
}

pub fn compare(
    contribution: f64,
    duration_months: u32,
    table: &StateContributionTable,
) -> PensionResult {
    let monthly_bonus = table.lookup(contribution);
    let mut accumulated = 0.0_f64;
    let mut series = Vec::with_capacity(duration_months as usize);

    for _ in 0..duration_months {
        accumulated += contribution + monthly_bonus;
        series.push(accumulated);
    }

    PensionResult {
        final_value: accumulated,
        total_contributed: contribution * duration_months as f64,
        total_bonus: monthly_bonus * duration_months as f64,
        monthly_bonus,
        monthly_value_series: series,
    }
}
