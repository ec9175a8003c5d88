//! CSV file market data adapter.
//!
//! One file per symbol in a base directory. The file name is the symbol with
//! every non-alphanumeric character replaced by `_` (`^GSPC` → `_GSPC.csv`,
//! `CZK=X` → `CZK_X.csv`). The header row must name a `date` and a `close`
//! column; other columns are ignored.

use crate::domain::error::SimulatorError;
use crate::domain::series::{SeriesPoint, TimeSeries};
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn file_name(symbol: &str) -> String {
        let stem: String = symbol
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{stem}.csv")
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(Self::file_name(symbol))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, SimulatorError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| SimulatorError::DataSource {
            reason: format!("missing {name} column"),
        })
}

impl MarketDataPort for CsvAdapter {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> Result<TimeSeries, SimulatorError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SimulatorError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| SimulatorError::DataSource {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let date_col = column(&headers, "date")?;
        let close_col = column(&headers, "close")?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SimulatorError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            // Timestamps such as "2024-01-02 00:00:00" keep only the date part
            let date_str = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SimulatorError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if date < start || date >= end_exclusive {
                continue;
            }

            let close_str = record.get(close_col).unwrap_or_default().trim();
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                continue;
            }
            let value: f64 = close_str.parse().map_err(|e| SimulatorError::DataSource {
                reason: format!("invalid close value '{}' on {}: {}", close_str, date, e),
            })?;

            points.push(SeriesPoint { date, value });
        }

        points.sort_by_key(|p| p.date);
        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SimulatorError::DataSource {
                reason: format!("duplicate date {} in {}", pair[1].date, path.display()),
            });
        }

        if points.is_empty() {
            return Err(SimulatorError::DataUnavailable {
                symbol: symbol.to_string(),
                start,
                end: end_exclusive,
            });
        }
        TimeSeries::new(symbol, points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let index = "Date,Open,High,Low,Close,Adj Close,Volume\n\
            2024-01-03,4745.2,4748.7,4729.2,4704.8,4704.8,3950760000\n\
            2024-01-02,4745.2,4754.3,4722.7,4742.8,4742.8,3743050000\n\
            2024-01-04,4697.4,4726.8,4687.5,4688.7,4688.7,3715480000\n\
            2024-01-05,4690.6,4721.5,4682.1,4697.2,4697.2,3844370000\n";
        fs::write(path.join("_GSPC.csv"), index).unwrap();

        let rates = "date,close\n\
            2024-01-02,22.41\n\
            2024-01-03,null\n\
            2024-01-04,22.63\n";
        fs::write(path.join("CZK_X.csv"), rates).unwrap();

        fs::write(path.join("BAD.csv"), "day,price\n2024-01-02,1.0\n").unwrap();

        let repeated = "date,close\n\
            2024-01-02,4742.8\n\
            2024-01-03,4704.8\n\
            2024-01-02,4750.0\n";
        fs::write(path.join("DUP.csv"), repeated).unwrap();

        (dir, path)
    }

    #[test]
    fn file_name_sanitizes_symbol() {
        assert_eq!(CsvAdapter::file_name("^GSPC"), "_GSPC.csv");
        assert_eq!(CsvAdapter::file_name("CZK=X"), "CZK_X.csv");
    }

    #[test]
    fn fetch_returns_sorted_closes() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let s = adapter.fetch("^GSPC", d(2024, 1, 2), d(2024, 1, 6)).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.points()[0].date, d(2024, 1, 2));
        assert_eq!(s.points()[0].value, 4742.8);
        assert_eq!(s.symbol(), "^GSPC");
    }

    #[test]
    fn fetch_end_is_exclusive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let s = adapter.fetch("^GSPC", d(2024, 1, 3), d(2024, 1, 5)).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.last().unwrap().date, d(2024, 1, 4));
    }

    #[test]
    fn null_closes_are_skipped() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let s = adapter.fetch("CZK=X", d(2024, 1, 1), d(2024, 2, 1)).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.value_on(d(2024, 1, 3)), None);
    }

    #[test]
    fn empty_range_is_data_unavailable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch("^GSPC", d(2023, 1, 1), d(2023, 2, 1)).unwrap_err();
        assert!(matches!(err, SimulatorError::DataUnavailable { symbol, .. } if symbol == "^GSPC"));
    }

    #[test]
    fn missing_file_is_data_source_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch("XYZ", d(2024, 1, 1), d(2024, 1, 31)).unwrap_err();
        assert!(matches!(err, SimulatorError::DataSource { .. }));
    }

    #[test]
    fn missing_close_column_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch("BAD", d(2024, 1, 1), d(2024, 1, 31)).unwrap_err();
        assert!(matches!(err, SimulatorError::DataSource { reason } if reason.contains("date")));
    }

    #[test]
    fn duplicate_date_is_data_source_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch("DUP", d(2024, 1, 1), d(2024, 2, 1)).unwrap_err();
        assert!(
            matches!(err, SimulatorError::DataSource { ref reason } if reason.contains("duplicate date 2024-01-02"))
        );
    }

    #[test]
    fn duplicate_outside_window_is_ignored() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let series = adapter.fetch("DUP", d(2024, 1, 3), d(2024, 2, 1)).unwrap();
        assert_eq!(series.len(), 1);
    }
}
