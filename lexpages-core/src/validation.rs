//! Validation error types

use std::fmt;

/// Validation error for admin input and domain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field is shorter than the minimum length
    TooShort { field: &'static str, min: usize },

    /// String doesn't match required format (e.g., label)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Required field missing from the payload
    Missing { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters long", field, min)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::Missing { field } => write!(f, "{} is required", field),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooShort {
            field: "tag name",
            min: 2,
        };
        assert_eq!(err.to_string(), "tag name must be at least 2 characters long");

        let err = ValidationError::InvalidVariant {
            field: "kind",
            value: "blog".into(),
        };
        assert_eq!(err.to_string(), "invalid kind value: 'blog'");
    }
}
