//! User domain entity.

use serde::{Deserialize, Serialize};

use crate::constants::{COLUMN_FIRST_NAME, COLUMN_LAST_NAME, TABLE_USER};
use crate::error::{DomainError, DomainResult};

/// User domain entity.
///
/// `id` is `None` until storage assigns one on the first save. The name
/// fields are optional only so that an incomplete user can be expressed;
/// such a user is rejected before it reaches storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// Create a transient user with both names set
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }

    /// Create a transient user from possibly missing names
    pub fn with_names(first_name: Option<String>, last_name: Option<String>) -> Self {
        Self {
            id: None,
            first_name,
            last_name,
        }
    }

    /// True until storage has assigned an identity
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Check whether both users refer to the same stored row.
    ///
    /// Transient users have no identity and never match anything.
    pub fn same_identity(&self, other: &User) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }

    /// Borrow both required names, or report the first missing column.
    ///
    /// Columns are checked in table order, so a user missing both names
    /// reports `FIRSTNAME`.
    pub fn require_names(&self) -> DomainResult<(&str, &str)> {
        let first_name = self
            .first_name
            .as_deref()
            .ok_or_else(|| DomainError::constraint_violation(TABLE_USER, COLUMN_FIRST_NAME))?;
        let last_name = self
            .last_name
            .as_deref()
            .ok_or_else(|| DomainError::constraint_violation(TABLE_USER, COLUMN_LAST_NAME))?;

        Ok((first_name, last_name))
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} {} {}",
            id,
            self.first_name.as_deref().unwrap_or("<null>"),
            self.last_name.as_deref().unwrap_or("<null>")
        )
    }
}
