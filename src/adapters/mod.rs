//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod holiday_file_adapter;
pub mod nyse_calendar;
pub mod report;
