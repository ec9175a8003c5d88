//! Number formatting and the textual result summary.

use crate::domain::comparison::Comparison;

/// Whole units with a space as thousands separator: `30691.8` → `30 692`.
pub fn format_thousands(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let rounded = x.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

/// Zero decimals with an explicit sign: `+2 %`, `-13 %`.
pub fn format_signed_percent(p: f64) -> String {
    format!("{:+.0} %", p)
}

pub fn format_percent_2(p: f64) -> String {
    format!("{:.2} %", p)
}

pub fn summary_lines(comparison: &Comparison) -> Vec<String> {
    let currency = &comparison.market.target_currency;
    let summary = &comparison.summary;

    let mut lines = vec![
        format!(
            "Value of the {} investment: {} {} ({})",
            comparison.market.index_symbol,
            format_thousands(summary.final_value),
            currency,
            format_signed_percent(summary.profit_loss_percent)
        ),
        match summary.cagr_percent {
            Some(cagr) => format!("Average annual return: {}", format_percent_2(cagr)),
            None => "Average annual return: cannot compute annualized return".to_string(),
        },
        format!(
            "Total amount invested: {} {}",
            format_thousands(summary.total_invested),
            currency
        ),
        format!(
            "Profit/loss: {} {}",
            format_thousands(summary.profit_loss_amount),
            currency
        ),
        format!("Number of investment months: {}", summary.duration_months),
    ];

    if let Some(pension) = &comparison.pension {
        lines.push(format!(
            "Pension scheme value: {} {} (state contributions {} {})",
            format_thousands(pension.final_value),
            currency,
            format_thousands(pension.total_bonus),
            currency
        ));
    }
    lines
}
