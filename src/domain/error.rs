//! Domain error types.

use chrono::NaiveDate;

/// User-correctable problems with the requested period or contribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("the investment period must span at least {min_years} year(s)")]
    PeriodTooShort { min_years: u32 },

    #[error("the start of the investment period must be before its end")]
    InvertedPeriod,

    #[error("start date {0} falls on a weekend or exchange holiday, choose a trading day")]
    StartOnNonTradingDay(NaiveDate),

    #[error("end date {0} falls on a weekend or exchange holiday, choose a trading day")]
    EndOnNonTradingDay(NaiveDate),

    #[error("monthly contribution {amount} is not an allowed amount")]
    ContributionNotAllowed { amount: f64 },
}

/// Top-level error type for indexgrowth.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no data for {symbol} between {start} and {end}")]
    DataUnavailable {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("insufficient data for {symbol}: have {have} months, need {need}")]
    InsufficientData {
        symbol: String,
        have: usize,
        need: usize,
    },

    #[error("no trading days in {year}-{month:02}")]
    EmptyMonth { year: i32, month: u32 },

    #[error("missing or zero exchange rate for {date}")]
    MissingRate { date: NaiveDate },

    #[error("invalid price {value} on {date}")]
    InvalidPrice { date: NaiveDate, value: f64 },

    #[error("series dates must be strictly increasing (at {date})")]
    UnorderedSeries { date: NaiveDate },

    #[error("cannot compute annualized return: {reason}")]
    DegenerateCagr { reason: String },

    #[error("unknown exchange: {0}")]
    UnknownExchange(String),

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimulatorError {
    /// Internal consistency failures: never shown in detail to the user.
    pub fn is_computation_failure(&self) -> bool {
        matches!(
            self,
            SimulatorError::InsufficientData { .. }
                | SimulatorError::EmptyMonth { .. }
                | SimulatorError::MissingRate { .. }
                | SimulatorError::InvalidPrice { .. }
                | SimulatorError::UnorderedSeries { .. }
        )
    }

    /// The single message shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            SimulatorError::Validation(e) => e.to_string(),
            SimulatorError::DataUnavailable { .. } | SimulatorError::DataSource { .. } => {
                format!("failed to load financial data ({self}), try another date or try later")
            }
            SimulatorError::DegenerateCagr { .. } => {
                "cannot compute annualized return".to_string()
            }
            e if e.is_computation_failure() => {
                "the computation failed, see the log for details".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<&SimulatorError> for std::process::ExitCode {
    fn from(err: &SimulatorError) -> Self {
        let code: u8 = match err {
            SimulatorError::Io(_) => 1,
            SimulatorError::ConfigParse { .. }
            | SimulatorError::ConfigMissing { .. }
            | SimulatorError::ConfigInvalid { .. }
            | SimulatorError::UnknownExchange(_) => 2,
            SimulatorError::Validation(_) => 3,
            SimulatorError::DataUnavailable { .. } | SimulatorError::DataSource { .. } => 4,
            SimulatorError::InsufficientData { .. }
            | SimulatorError::EmptyMonth { .. }
            | SimulatorError::MissingRate { .. }
            | SimulatorError::InvalidPrice { .. }
            | SimulatorError::UnorderedSeries { .. }
            | SimulatorError::DegenerateCagr { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
