//! Port traits the domain consumes.

pub mod config_port;
pub mod holiday_port;
pub mod market_data_port;
pub mod report_port;
