//! Validation error types

use std::fmt;

/// Rejection of submitted article data, raised before anything touches disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// String doesn't match the required format
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Submitted publish date is not a `YYYY-MM-DD` date
    InvalidDate { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidDate { value } => {
                write!(f, "publish date '{}' is not a YYYY-MM-DD date", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
