//! HTML report adapter implementing ReportPort.
//!
//! Renders the comparison summary, a monthly table, the inline SVG growth
//! chart and the index price chart through an Askama template.

pub mod chart_svg;
pub mod summary;

use std::fs;
use std::path::Path;

use crate::domain::comparison::Comparison;
use crate::domain::error::SimulatorError;
use crate::ports::report_port::ReportPort;

use askama::Template;
use chart_svg::{generate_growth_svg, generate_price_svg};
use summary::{format_thousands, summary_lines};

struct MonthlyRow {
    month: String,
    invested: String,
    value: String,
    pension: String,
}

fn monthly_rows(comparison: &Comparison) -> Vec<MonthlyRow> {
    let pension = comparison.pension.as_ref();
    comparison
        .simulation
        .monthly_value_series
        .iter()
        .enumerate()
        .map(|(i, m)| MonthlyRow {
            month: format!("{}-{:02}", m.year, m.month),
            invested: format_thousands(m.invested),
            value: format_thousands(m.value),
            pension: pension
                .and_then(|p| p.monthly_value_series.get(i))
                .map(|&v| format_thousands(v))
                .unwrap_or_default(),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    index_symbol: &'a str,
    rate_symbol: &'a str,
    currency: &'a str,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    policy: String,
    monthly_contribution: String,
    summary: Vec<String>,
    growth_svg: String,
    price_svg: String,
    has_pension: bool,
    rows: Vec<MonthlyRow>,
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(comparison: &Comparison) -> Result<String, SimulatorError> {
        let template = ReportTemplate {
            index_symbol: &comparison.market.index_symbol,
            rate_symbol: &comparison.market.rate_symbol,
            currency: &comparison.market.target_currency,
            start_date: comparison.period.start(),
            end_date: comparison.period.end(),
            policy: comparison.simulation.policy.to_string(),
            monthly_contribution: format_thousands(comparison.monthly_contribution),
            summary: summary_lines(comparison),
            growth_svg: generate_growth_svg(comparison),
            price_svg: generate_price_svg(comparison),
            has_pension: comparison.pension.is_some(),
            rows: monthly_rows(comparison),
        };

        template
            .render()
            .map_err(|e| SimulatorError::Io(std::io::Error::other(e.to_string())))
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, comparison: &Comparison, output_path: &str) -> Result<(), SimulatorError> {
        let html = Self::render(comparison)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SimulatorError::Io)?;
        }
        fs::write(path, html).map_err(SimulatorError::Io)?;
        log::info!("report written to {}", path.display());

        Ok(())
    }
}
