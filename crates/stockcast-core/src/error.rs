//! Error types for the forecasting engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors raised by the forecasting stages.
///
/// Every stage reports failures synchronously; nothing is retried or
/// recovered locally, so the variant seen by the caller is the one raised
/// by the stage that detected the problem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Non-monotonic time: observation {index} dated {current} does not follow {previous}")]
    NonMonotonicTime {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Invalid configuration '{param}' = '{value}': {reason}")]
    InvalidConfiguration {
        param: String,
        value: String,
        reason: String,
    },

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ForecastError {
    pub(crate) fn invalid_config(
        param: &str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ForecastError::InvalidConfiguration {
            param: param.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
