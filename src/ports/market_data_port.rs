//! Market data access port trait.

use crate::domain::error::SimulatorError;
use crate::domain::series::TimeSeries;
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Daily closes for `symbol` with `start <= date < end_exclusive`.
    ///
    /// Fails with [`SimulatorError::DataUnavailable`] when the range holds no
    /// observation.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<TimeSeries, SimulatorError>;
}
