//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Validation and business rule failures.
///
/// Every variant is the client's fault and maps to a 400 response.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Email is not syntactically valid
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// A required text field is empty or whitespace
    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),

    /// A text field is longer than its column allows
    #[error("Field {field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    /// Password exceeds what bcrypt can hash without truncation
    #[error("Password must be at most {max} bytes")]
    PasswordTooLong { max: usize },

    /// A date filter could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Date range filter with start after end
    #[error("start_date must not be after end_date")]
    InvertedDateRange,

    /// Totals exceed the representable decimal range
    #[error("Transaction amounts are too large to total")]
    AmountOutOfRange,
}

impl DomainError {
    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate(value.into())
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "invalid_email",
            Self::EmptyField(_) => "empty_field",
            Self::FieldTooLong { .. } => "field_too_long",
            Self::PasswordTooLong { .. } => "password_too_long",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvertedDateRange => "invalid_date_range",
            Self::AmountOutOfRange => "amount_out_of_range",
        }
    }
}
