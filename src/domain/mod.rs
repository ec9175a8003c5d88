//! Core domain types and logic.

pub mod series;
pub mod period;
pub mod calendar;
pub mod returns;
pub mod simulation;
pub mod pension;
pub mod performance;
pub mod contribution;
pub mod config;
pub mod config_validation;
pub mod comparison;
pub mod error;
