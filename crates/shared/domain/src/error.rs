//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (database, CLI).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required column would be stored without a value
    #[error("integrity constraint violation: NOT NULL check constraint; table: {table} column: {column}")]
    ConstraintViolation { table: String, column: String },
}

impl DomainError {
    /// Create a not-null violation for a column of the given table
    pub fn constraint_violation(table: impl Into<String>, column: impl Into<String>) -> Self {
        DomainError::ConstraintViolation {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
