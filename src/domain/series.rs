//! Daily time series of closing prices and exchange rates.

use crate::domain::error::SimulatorError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ordered `(date, value)` observations with strictly increasing dates.
///
/// Non-trading days are simply absent. The series is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    symbol: String,
    points: Vec<SeriesPoint>,
}

/// Closing prices of the equity index.
pub type PriceSeries = TimeSeries;

/// Target-currency units per one source-currency unit.
pub type ExchangeRateSeries = TimeSeries;

impl TimeSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<SeriesPoint>) -> Result<Self, SimulatorError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SimulatorError::UnorderedSeries { date: pair[1].date });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    /// Build from `(date, value)` tuples.
    pub fn from_pairs(
        symbol: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Result<Self, SimulatorError> {
        let points = pairs
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Observation exactly on `date`.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Last observation on or before `date`; the first observation when
    /// `date` precedes the whole series.
    pub fn value_as_of(&self, date: NaiveDate) -> Option<f64> {
        match self.points.binary_search_by_key(&date, |p| p.date) {
            Ok(i) => Some(self.points[i].value),
            Err(0) => self.first().map(|p| p.value),
            Err(i) => Some(self.points[i - 1].value),
        }
    }

    /// Observations with `start <= date <= end`.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> &[SeriesPoint] {
        let lo = self.points.partition_point(|p| p.date < start);
        let hi = self.points.partition_point(|p| p.date <= end);
        if lo >= hi { &[] } else { &self.points[lo..hi] }
    }
}
