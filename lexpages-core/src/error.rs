/// Structured error types for lexpages-core.
///
/// Library consumers get `thiserror` enums; the `lexpages` binary wraps
/// them in `anyhow` with context.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::kind::PageKind;
use crate::validation::ValidationError;

/// Main error type for lexpages-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Input failed field validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A page was attached to a parent of an incompatible kind
    #[error("a page of kind '{child}' cannot be a child of a '{}' page", parent.map(PageKind::as_str).unwrap_or("(none)"))]
    IncompatibleParent {
        child: PageKind,
        parent: Option<PageKind>,
    },

    /// The page source failed while resolving a path
    #[error("page lookup failed: {reason}")]
    Lookup { reason: String },

    /// Configuration file could not be parsed
    #[error("Configuration error in {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Result type alias for lexpages-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a lookup error from any displayable source
    pub fn lookup(reason: impl ToString) -> Self {
        Self::Lookup {
            reason: reason.to_string(),
        }
    }

    /// Create a config error
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incompatible_parent_display() {
        let err = CoreError::IncompatibleParent {
            child: PageKind::Subcategory,
            parent: Some(PageKind::Main),
        };
        assert_eq!(
            err.to_string(),
            "a page of kind 'subcategory' cannot be a child of a 'main' page"
        );

        let err = CoreError::IncompatibleParent {
            child: PageKind::Paper,
            parent: None,
        };
        assert!(err.to_string().contains("(none)"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
