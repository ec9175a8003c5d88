//! Holiday calendar loaded from a CSV file with a `date` column.
//!
//! The file replaces the rule-based calendar for whatever exchange is
//! configured; other columns (for example a holiday name) are ignored.

use crate::domain::calendar::HolidaySet;
use crate::domain::error::SimulatorError;
use crate::ports::holiday_port::HolidayCalendarPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct HolidayRecord {
    date: NaiveDate,
}

pub struct HolidayFileAdapter {
    path: PathBuf,
}

impl HolidayFileAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HolidayCalendarPort for HolidayFileAdapter {
    fn holidays_for(&self, exchange: &str) -> Result<HolidaySet, SimulatorError> {
        let mut rdr = csv::Reader::from_path(&self.path).map_err(|e| SimulatorError::DataSource {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut set = HolidaySet::new();
        for result in rdr.deserialize::<HolidayRecord>() {
            let record = result.map_err(|e| SimulatorError::DataSource {
                reason: format!("holiday file {}: {}", self.path.display(), e),
            })?;
            set.insert(record.date);
        }
        log::debug!(
            "loaded {} holidays for {} from {}",
            set.len(),
            exchange,
            self.path.display()
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_dates_and_ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holidays.csv");
        fs::write(
            &path,
            "date,name\n2024-12-25,Christmas\n2024-01-01,New Year\n2024-12-25,Christmas\n",
        )
        .unwrap();

        let set = HolidayFileAdapter::new(path).holidays_for("NYSE").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    }

    #[test]
    fn bad_date_is_data_source_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holidays.csv");
        fs::write(&path, "date\n25/12/2024\n").unwrap();

        let err = HolidayFileAdapter::new(path).holidays_for("NYSE").unwrap_err();
        assert!(matches!(err, SimulatorError::DataSource { .. }));
    }

    #[test]
    fn missing_file_is_data_source_error() {
        let err = HolidayFileAdapter::new(PathBuf::from("/nonexistent/holidays.csv"))
            .holidays_for("NYSE")
            .unwrap_err();
        assert!(matches!(err, SimulatorError::DataSource { .. }));
    }
}
