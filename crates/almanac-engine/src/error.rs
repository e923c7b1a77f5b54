//! Error types for almanac-engine operations.

use thiserror::Error;

/// Rejection of malformed input at the validation boundary.
///
/// The engine itself never produces these: every event reaching
/// [`query_occurrences`](crate::query_occurrences) has already passed
/// validation, and expansion over validated inputs is infallible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field} date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("event end must not be before start")]
    EndBeforeStart,

    #[error("recurrence interval must be a positive integer, got {0}")]
    NonPositiveInterval(i64),

    #[error("recurrence count must be a positive integer, got {0}")]
    NonPositiveCount(i64),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Failures from the repository layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("calendar not found: {0}")]
    CalendarNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
