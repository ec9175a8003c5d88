//! Allowed monthly contribution amounts.

use crate::domain::error::ValidationError;

pub const DEFAULT_TIERS: [u32; 6] = [300, 500, 1000, 1500, 1700, 2000];

#[derive(Debug, Clone, PartialEq)]
pub enum ContributionRule {
    /// Any amount in `min..=max` on a `step` grid starting at `min`.
    FreeForm { min: f64, max: f64, step: f64 },
    /// One of a fixed set of amounts.
    Tiered(Vec<u32>),
}

impl ContributionRule {
    pub fn default_free_form() -> Self {
        ContributionRule::FreeForm {
            min: 2000.0,
            max: 20_000.0,
            step: 1000.0,
        }
    }

    pub fn default_tiered() -> Self {
        ContributionRule::Tiered(DEFAULT_TIERS.to_vec())
    }

    pub fn validate(&self, amount: f64) -> Result<(), ValidationError> {
        let allowed = match self {
            ContributionRule::FreeForm { min, max, step } => {
                let in_range = amount.is_finite() && amount >= *min && amount <= *max;
                let on_grid = if *step > 0.0 {
                    let steps = (amount - min) / step;
                    (steps - steps.round()).abs() < 1e-9
                } else {
                    true
                };
                in_range && on_grid
            }
            ContributionRule::Tiered(tiers) => tiers.iter().any(|&t| f64::from(t) == amount),
        };

        if allowed {
            Ok(())
        } else {
            Err(ValidationError::ContributionNotAllowed { amount })
        }
    }
}

impl Default for ContributionRule {
    fn default() -> Self {
        Self::default_free_form()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_form_accepts_grid_amounts() {
        let rule = ContributionRule::default_free_form();
        assert!(rule.validate(2000.0).is_ok());
        assert!(rule.validate(10_000.0).is_ok());
        assert!(rule.validate(20_000.0).is_ok());
    }

    #[test]
    fn free_form_rejects_out_of_range() {
        let rule = ContributionRule::default_free_form();
        assert_eq!(
            rule.validate(1000.0),
            Err(ValidationError::ContributionNotAllowed { amount: 1000.0 })
        );
        assert!(rule.validate(21_000.0).is_err());
        assert!(rule.validate(f64::NAN).is_err());
    }

    #[test]
    fn free_form_rejects_off_grid() {
        let rule = ContributionRule::default_free_form();
        assert!(rule.validate(2500.0).is_err());
    }

    #[test]
    fn zero_step_allows_any_amount_in_range() {
        let rule = ContributionRule::FreeForm {
            min: 1.0,
            max: 100.0,
            step: 0.0,
        };
        assert!(rule.validate(33.3).is_ok());
    }

    #[test]
    fn tiered_requires_membership() {
        let rule = ContributionRule::default_tiered();
        assert!(rule.validate(300.0).is_ok());
        assert!(rule.validate(1700.0).is_ok());
        assert!(rule.validate(1200.0).is_err());
    }
}
