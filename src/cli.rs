//! CLI definition and dispatch.

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::holiday_file_adapter::HolidayFileAdapter;
use crate::adapters::nyse_calendar::NyseCalendarAdapter;
use crate::adapters::report::summary::summary_lines;
use crate::adapters::report::HtmlReportAdapter;
use crate::domain::comparison::{run_comparison, validate_request, Comparison};
use crate::domain::config::{build_simulation_config, ConfigOverrides, SimulationConfig};
use crate::domain::config_validation::validate_simulation_config;
use crate::domain::error::SimulatorError;
use crate::domain::period::months_between;
use crate::domain::simulation::RateConversionPolicy;
use crate::ports::config_port::ConfigPort;
use crate::ports::holiday_port::HolidayCalendarPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "indexgrowth",
    about = "Monthly index investing simulator with a state pension comparison"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate monthly contributions into the index
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Monthly contribution in the target currency
        #[arg(long)]
        contribution: Option<f64>,
        /// fix_at_entry, fix_at_exit or monthly_repricing
        #[arg(long)]
        policy: Option<RateConversionPolicy>,
        /// Also compare against the state-supported pension scheme
        #[arg(long)]
        pension: bool,
        /// Write an HTML report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the full result as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Check the period and contribution without loading market data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// List exchange closures in a year
    Holidays {
        #[arg(long)]
        year: i32,
        #[arg(long, default_value = "NYSE")]
        exchange: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Count the contribution months between two dates
    Months {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            start,
            end,
            contribution,
            policy,
            pension,
            output,
            json,
        } => {
            let overrides = ConfigOverrides {
                start_date: start,
                end_date: end,
                monthly_contribution: contribution,
                policy,
                pension: pension.then_some(true),
            };
            run_simulate(&config, &overrides, output.as_deref(), json)
        }
        Command::Validate { config, start, end } => {
            let overrides = ConfigOverrides {
                start_date: start,
                end_date: end,
                ..Default::default()
            };
            run_validate(&config, &overrides)
        }
        Command::Holidays {
            year,
            exchange,
            config,
        } => run_holidays(year, &exchange, config.as_deref()),
        Command::Months { start, end } => run_months(start, end),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SimulatorError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Print the user-facing message for `err` and map it to an exit code.
/// Internal consistency failures are logged in full first.
pub fn report_error(err: &SimulatorError) -> ExitCode {
    if err.is_computation_failure() {
        log::error!("{err}");
    }
    eprintln!("error: {}", err.user_message());
    err.into()
}

/// `[calendar] holidays_file` when set, the rule-based NYSE calendar otherwise.
pub fn holiday_calendar(config: &dyn ConfigPort) -> Box<dyn HolidayCalendarPort> {
    match config.get_string("calendar", "holidays_file") {
        Some(path) => Box::new(HolidayFileAdapter::new(PathBuf::from(path))),
        None => Box::new(NyseCalendarAdapter::default()),
    }
}

pub fn market_data(config: &dyn ConfigPort) -> CsvAdapter {
    let dir = config
        .get_string("data", "dir")
        .unwrap_or_else(|| "data".to_string());
    CsvAdapter::new(PathBuf::from(dir))
}

fn load_simulation_config(
    config_path: &Path,
    overrides: &ConfigOverrides,
) -> Result<(FileConfigAdapter, SimulationConfig), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    if let Err(e) = validate_simulation_config(&adapter) {
        return Err(report_error(&e));
    }
    match build_simulation_config(&adapter, overrides) {
        Ok(config) => Ok((adapter, config)),
        Err(e) => Err(report_error(&e)),
    }
}

fn run_simulate(
    config_path: &Path,
    overrides: &ConfigOverrides,
    output: Option<&Path>,
    json: bool,
) -> ExitCode {
    let (adapter, config) = match load_simulation_config(config_path, overrides) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let market = market_data(&adapter);
    let holidays = holiday_calendar(&adapter);
    run_simulation_pipeline(&market, holidays.as_ref(), &config, output, json)
}

/// Run one comparison and present it: summary on stdout (or JSON), optional
/// HTML report.
pub fn run_simulation_pipeline(
    market: &dyn MarketDataPort,
    holidays: &dyn HolidayCalendarPort,
    config: &SimulationConfig,
    output: Option<&Path>,
    json: bool,
) -> ExitCode {
    eprintln!(
        "Simulating {} from {} to {}...",
        config.market.index_symbol, config.start_date, config.end_date
    );
    let comparison = match run_comparison(market, holidays, config) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    if json {
        match comparison_json(&comparison) {
            Ok(s) => println!("{s}"),
            Err(e) => return report_error(&e),
        }
    } else {
        for line in summary_lines(&comparison) {
            println!("{line}");
        }
    }

    if let Some(path) = output {
        let reporter = HtmlReportAdapter::new();
        match reporter.write(&comparison, &path.to_string_lossy()) {
            Ok(()) => eprintln!("\nReport written to: {}", path.display()),
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                return (&e).into();
            }
        }
    }
    ExitCode::SUCCESS
}

pub fn comparison_json(comparison: &Comparison) -> Result<String, SimulatorError> {
    serde_json::to_string_pretty(comparison).map_err(|e| SimulatorError::Io(e.into()))
}

fn run_validate(config_path: &Path, overrides: &ConfigOverrides) -> ExitCode {
    let (adapter, config) = match load_simulation_config(config_path, overrides) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let holidays = holiday_calendar(&adapter);
    match validate_request(holidays.as_ref(), &config) {
        Ok(period) => {
            eprintln!("Config validated successfully");
            println!(
                "{} to {}: {} months, {:.2} years",
                period.start(),
                period.end(),
                period.months(),
                period.elapsed_years()
            );
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn run_holidays(year: i32, exchange: &str, config_path: Option<&Path>) -> ExitCode {
    let calendar: Box<dyn HolidayCalendarPort> = match config_path {
        Some(path) => match load_config(path) {
            Ok(adapter) => holiday_calendar(&adapter),
            Err(code) => return code,
        },
        None => Box::new(NyseCalendarAdapter::default()),
    };

    let holidays = match calendar.holidays_for(exchange) {
        Ok(h) => h,
        Err(e) => return report_error(&e),
    };

    let in_year: Vec<_> = holidays.iter().filter(|d| d.year() == year).collect();
    if in_year.is_empty() {
        eprintln!("No closures found for {} in {}", exchange, year);
    } else {
        for date in &in_year {
            println!("{} {}", date, date.weekday());
        }
        eprintln!("{} closures found", in_year.len());
    }
    ExitCode::SUCCESS
}

fn run_months(start: NaiveDate, end: NaiveDate) -> ExitCode {
    println!("{}", months_between(start, end));
    ExitCode::SUCCESS
}
