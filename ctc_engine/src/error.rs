//! Error type for structurally invalid input.
//!
//! Business-rule outcomes (future periods, ineligible selections) are
//! not errors; they are reported through
//! [`PeriodValidationResult`](crate::models::PeriodValidationResult).
//! A [`CtcError`] means the caller handed the core something it could
//! never have meant, such as month 13.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CtcError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("year must be between {min} and {max}, got {0}", min = crate::models::MIN_YEAR, max = crate::models::MAX_YEAR)]
    InvalidYear(i32),

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("employee {0} is not on the roster")]
    UnknownEmployee(String),
}
