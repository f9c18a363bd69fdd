//! Unified error handling for the repository layer and its binaries.
//!
//! Pre-save validation failures and storage not-null failures both map to
//! [`AppError::ConstraintViolation`].

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Integrity
    #[error("integrity constraint violation: NOT NULL check constraint; table: {table} column: {column}")]
    ConstraintViolation { table: String, column: String },

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            AppError::NotFound => "NOT_FOUND",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Column named by a constraint violation, if this is one
    pub fn violated_column(&self) -> Option<&str> {
        match self {
            AppError::ConstraintViolation { column, .. } => Some(column.as_str()),
            _ => None,
        }
    }
}

// =============================================================================
// Database Error Conversion
// =============================================================================

#[cfg(feature = "database")]
mod database {
    use once_cell::sync::Lazy;
    use regex::Regex;
    use sea_orm::DbErr;

    use super::AppError;

    /// SQLite reports not-null failures as `NOT NULL constraint failed: TABLE.COLUMN`
    static NOT_NULL_FAILED: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"NOT NULL constraint failed: (\w+)\.(\w+)").expect("not-null pattern is valid")
    });

    /// Extract `(table, column)` from a storage not-null failure message
    pub(super) fn not_null_violation(message: &str) -> Option<(String, String)> {
        let captures = NOT_NULL_FAILED.captures(message)?;
        Some((captures[1].to_string(), captures[2].to_string()))
    }

    impl From<DbErr> for AppError {
        fn from(err: DbErr) -> Self {
            if matches!(err, DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) {
                return AppError::NotFound;
            }

            match not_null_violation(&err.to_string()) {
                Some((table, column)) => AppError::ConstraintViolation { table, column },
                None => AppError::Database(err),
            }
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ConstraintViolation { table, column } => {
                AppError::ConstraintViolation { table, column }
            }
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn constraint_violation(table: impl Into<String>, column: impl Into<String>) -> Self {
        AppError::ConstraintViolation {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
