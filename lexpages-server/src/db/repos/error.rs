//! Repository error type

use lexpages_core::{CoreError, PageKind, ValidationError};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Domain rule violated by the requested change
    #[error(transparent)]
    Rule(#[from] CoreError),

    /// A stored value does not map back to a domain type
    #[error("corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },

    /// Password could not be hashed, or a stored hash is unreadable
    #[error("password hash error: {reason}")]
    Credentials { reason: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Unique, foreign-key or check constraint violation.
    pub fn is_integrity_violation(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(db)) => {
                db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
            }
            _ => false,
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(e: ValidationError) -> Self {
        Self::Rule(CoreError::Validation(e))
    }
}

/// Parse a `kind` column.
pub(crate) fn decode_kind(table: &'static str, raw: &str) -> Result<PageKind, DbError> {
    raw.parse().map_err(|e: ValidationError| DbError::Corrupt {
        table,
        reason: e.to_string(),
    })
}
