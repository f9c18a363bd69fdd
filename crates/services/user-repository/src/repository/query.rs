//! Explicit finder specification.
//!
//! A [`UserQuery`] is a predicate plus an ordered list of sort keys. The
//! store turns it into a SeaORM `Select`; named finders such as
//! `find_by_first_name_order_by_last_name_asc` are just constructors of
//! a query.
//!
//! Pattern filters use `%`-wildcard `LIKE` syntax but run as SQLite `GLOB`,
//! which compares case-sensitively.

use sea_orm::sea_query::{BinOper, Expr};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};

use super::entities::user::{self, Entity as UserEntity};

/// Queryable user columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Id,
    FirstName,
    LastName,
}

impl UserColumn {
    fn column(self) -> user::Column {
        match self {
            UserColumn::Id => user::Column::Id,
            UserColumn::FirstName => user::Column::FirstName,
            UserColumn::LastName => user::Column::LastName,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub column: UserColumn,
    pub direction: SortDirection,
}

/// Row predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    FirstNameEquals(String),
    /// `%` matches any sequence; every other character is literal and
    /// case-sensitive
    FirstNameLike(String),
}

/// Predicate plus sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub filter: UserFilter,
    pub sorts: Vec<UserSort>,
}

impl UserQuery {
    /// Every row
    pub fn all() -> Self {
        Self {
            filter: UserFilter::All,
            sorts: Vec::new(),
        }
    }

    /// Rows whose first name equals `name`
    pub fn first_name_equals(name: impl Into<String>) -> Self {
        Self {
            filter: UserFilter::FirstNameEquals(name.into()),
            sorts: Vec::new(),
        }
    }

    /// Rows whose first name matches the `%`-wildcard pattern
    pub fn first_name_like(pattern: impl Into<String>) -> Self {
        Self {
            filter: UserFilter::FirstNameLike(pattern.into()),
            sorts: Vec::new(),
        }
    }

    pub fn order_by_asc(mut self, column: UserColumn) -> Self {
        self.sorts.push(UserSort {
            column,
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn order_by_desc(mut self, column: UserColumn) -> Self {
        self.sorts.push(UserSort {
            column,
            direction: SortDirection::Desc,
        });
        self
    }

    /// Build the SeaORM select.
    ///
    /// `ID ASC` is appended unless the caller already sorts by id, so ties
    /// come back in insertion order.
    pub fn into_select(self) -> Select<UserEntity> {
        let mut select = UserEntity::find();

        select = match self.filter {
            UserFilter::All => select,
            UserFilter::FirstNameEquals(name) => select.filter(user::Column::FirstName.eq(name)),
            UserFilter::FirstNameLike(pattern) => select.filter(
                Expr::col((UserEntity, user::Column::FirstName))
                    .binary(BinOper::Custom("GLOB"), like_to_glob(&pattern)),
            ),
        };

        let sorted_by_id = self.sorts.iter().any(|s| s.column == UserColumn::Id);
        for sort in self.sorts {
            select = match sort.direction {
                SortDirection::Asc => select.order_by_asc(sort.column.column()),
                SortDirection::Desc => select.order_by_desc(sort.column.column()),
            };
        }
        if !sorted_by_id {
            select = select.order_by_asc(user::Column::Id);
        }

        select
    }
}

/// Translate a `%`-wildcard pattern into an equivalent `GLOB` pattern.
///
/// `%` becomes `*`; the `GLOB` metacharacters `*`, `?` and `[` are wrapped
/// in brackets so they match literally.
pub fn like_to_glob(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '%' => glob.push('*'),
            '*' | '?' | '[' => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            _ => glob.push(c),
        }
    }
    glob
}
