//! Exchange holiday calendar port trait.

use crate::domain::calendar::HolidaySet;
use crate::domain::error::SimulatorError;

pub trait HolidayCalendarPort {
    fn holidays_for(&self, exchange: &str) -> Result<HolidaySet, SimulatorError>;
}
