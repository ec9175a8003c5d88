//! Report generation port trait.

use crate::domain::comparison::Comparison;
use crate::domain::error::SimulatorError;

/// Port for writing simulation reports.
pub trait ReportPort {
    fn write(&self, comparison: &Comparison, output_path: &str) -> Result<(), SimulatorError>;
}
