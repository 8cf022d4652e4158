//! Error types for the schedule model

use thiserror::Error;

/// Errors raised when constructing model values from raw input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Hour outside 1-12
    #[error("Invalid hour: {0}")]
    InvalidHour(String),

    /// Minute not one of 00, 15, 30, 45
    #[error("Invalid minute: {0}")]
    InvalidMinute(String),

    /// Period other than AM/PM
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Unknown weekday token
    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    /// Unparseable time string
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}
