//! SVG line charts for reports: the contribution growth chart and the index
//! price history.

use crate::adapters::report::summary::format_thousands;
use crate::domain::comparison::Comparison;
use crate::domain::period::month_end;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub color: &'static str,
    pub dashed: bool,
}

/// Series sharing one x axis of dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<ChartSeries>,
    /// Start the y axis at zero instead of the lowest value.
    pub zero_baseline: bool,
}

pub fn chart_series(comparison: &Comparison) -> ChartData {
    let simulation = &comparison.simulation;
    let dates = simulation
        .monthly_value_series
        .iter()
        .map(|m| month_end(m.year, m.month))
        .collect();

    let mut series = vec![ChartSeries {
        label: format!("{} value", comparison.market.index_symbol),
        values: simulation.monthly_value_series.iter().map(|m| m.value).collect(),
        color: "#2563eb",
        dashed: false,
    }];
    if let Some(pension) = &comparison.pension {
        series.push(ChartSeries {
            label: "Pension scheme value".to_string(),
            values: pension.monthly_value_series.clone(),
            color: "#16a34a",
            dashed: false,
        });
    }
    series.push(ChartSeries {
        label: "Contributed only".to_string(),
        values: simulation.contributed_series().collect(),
        color: "#6b7280",
        dashed: true,
    });

    ChartData {
        title: format!("Value ({})", comparison.market.target_currency),
        dates,
        series,
        zero_baseline: true,
    }
}

/// Daily index closes inside the period.
pub fn price_chart(comparison: &Comparison) -> ChartData {
    let market = &comparison.market;
    ChartData {
        title: format!(
            "{} price history ({})",
            market.index_symbol, market.source_currency
        ),
        dates: comparison.price_history.iter().map(|p| p.date).collect(),
        series: vec![ChartSeries {
            label: format!("{} close", market.index_symbol),
            values: comparison.price_history.iter().map(|p| p.value).collect(),
            color: "#dc2626",
            dashed: false,
        }],
        zero_baseline: false,
    }
}

pub fn generate_growth_svg(comparison: &Comparison) -> String {
    render_line_svg(&chart_series(comparison))
}

pub fn generate_price_svg(comparison: &Comparison) -> String {
    render_line_svg(&price_chart(comparison))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 40.0;

pub fn render_line_svg(chart: &ChartData) -> String {
    if chart.dates.is_empty() {
        return String::new();
    }

    let all_values = || chart.series.iter().flat_map(|s| s.values.iter().copied());
    let floor = if chart.zero_baseline { 0.0 } else { f64::INFINITY };
    let min_value = all_values().fold(floor, f64::min);
    let max_value = all_values().fold(f64::NEG_INFINITY, f64::max).max(min_value);
    let range = (max_value - min_value).max(1.0);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let x_scale = |i: usize| -> f64 {
        MARGIN_LEFT + (i as f64 / (chart.dates.len() - 1).max(1) as f64) * plot_width
    };
    let y_scale =
        |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min_value) / range) * plot_height };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" text-anchor=\"end\" font-size=\"12\" fill=\"#666\">{}</text>\n",
        CHART_WIDTH - MARGIN_RIGHT,
        escape_xml(&chart.title)
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));

    for value in [max_value, (max_value + min_value) / 2.0, min_value] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT - 5.0,
            y_scale(value) + 4.0,
            format_thousands(value)
        ));
    }

    let last = chart.dates.len() - 1;
    for i in [0, last / 2, last] {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            x_scale(i),
            CHART_HEIGHT - MARGIN_BOTTOM / 2.0 + 5.0,
            chart.dates[i]
        ));
    }

    for series in &chart.series {
        let mut path_data = String::new();
        for (i, &value) in series.values.iter().enumerate() {
            let cmd = if i == 0 { "M" } else { " L" };
            path_data.push_str(&format!("{} {:.1} {:.1}", cmd, x_scale(i), y_scale(value)));
        }
        let dash = if series.dashed {
            " stroke-dasharray=\"6 4\""
        } else {
            ""
        };
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"{}/>\n",
            path_data, series.color, dash
        ));
    }

    for (i, series) in chart.series.iter().enumerate() {
        let x = MARGIN_LEFT + 10.0 + i as f64 * 190.0;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"8\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
            x, series.color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"18\" font-size=\"11\" fill=\"#333\">{}</text>\n",
            x + 16.0,
            escape_xml(&series.label)
        ));
    }

    svg.push_str("</svg>");
    svg
}
