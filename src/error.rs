//! Error types shared by the calculator, composer and comparison layers

use thiserror::Error;

/// Errors raised by loan simulation
#[derive(Debug, Error)]
pub enum LoanError {
    /// Rejected at the boundary before any amortization runs
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    /// Comparison horizon past the end of a computed schedule
    #[error("index {index} out of range for schedule of {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    /// Principal portions did not add back to the borrowed principal.
    /// Only an implementation bug can produce this.
    #[error("rounding invariant violated: expected {expected}, got {actual}")]
    RoundingInvariantViolation { expected: i64, actual: i64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
