//! User repository implementation.

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait,
};
use tracing::debug;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::query::{UserColumn, UserQuery};
use common::{AppError, AppResult};
use domain::User;

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Every call runs in its own transaction. Saving validates the required
/// names first, so an incomplete user fails with
/// [`AppError::ConstraintViolation`] before touching storage.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a transient user or update a stored one
    async fn save(&self, user: User) -> AppResult<User>;

    /// Save every user in one transaction (all or nothing)
    async fn save_all(&self, users: Vec<User>) -> AppResult<Vec<User>>;

    /// Delete by id; succeeds even when the row does not exist
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Delete the given users by id, returning rows removed.
    ///
    /// Users without an id are skipped.
    async fn delete_all_of(&self, users: &[User]) -> AppResult<u64>;

    /// Delete every row, returning rows removed
    async fn delete_all(&self) -> AppResult<u64>;

    /// Check whether a row with this id is stored
    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Find user by id
    async fn find_one(&self, id: i64) -> AppResult<Option<User>>;

    /// List every stored user, ordered by id
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Number of stored users
    async fn count(&self) -> AppResult<u64>;

    /// Run an explicit query specification
    async fn query(&self, query: UserQuery) -> AppResult<Vec<User>>;

    /// Exact first-name match, ordered by last name ascending
    async fn find_by_first_name_order_by_last_name_asc(&self, name: &str) -> AppResult<Vec<User>>;

    /// Case-sensitive first-name pattern match where only `%` is a wildcard
    async fn get_by_first_name_like(&self, pattern: &str) -> AppResult<Vec<User>>;
}

/// SQLite's default cap on bound parameters per statement
const DELETE_CHUNK_SIZE: usize = 999;

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert or update one already-validated user inside `txn`
    async fn persist(txn: &DatabaseTransaction, user: User) -> AppResult<User> {
        let (first_name, last_name) = user.require_names()?;
        let first_name = Set(first_name.to_string());
        let last_name = Set(last_name.to_string());

        let model = match user.id {
            None => {
                ActiveModel {
                    id: NotSet,
                    first_name,
                    last_name,
                }
                .insert(txn)
                .await?
            }
            Some(id) => {
                ActiveModel {
                    id: Unchanged(id),
                    first_name,
                    last_name,
                }
                .update(txn)
                .await?
            }
        };

        Ok(User::from(model))
    }

    async fn persist_all(txn: &DatabaseTransaction, users: Vec<User>) -> AppResult<Vec<User>> {
        let mut saved = Vec::with_capacity(users.len());
        for user in users {
            saved.push(Self::persist(txn, user).await?);
        }
        Ok(saved)
    }

    async fn delete_ids(txn: &DatabaseTransaction, ids: &[i64]) -> AppResult<u64> {
        let mut removed = 0;
        for chunk in ids.chunks(DELETE_CHUNK_SIZE) {
            let result = UserEntity::delete_many()
                .filter(user::Column::Id.is_in(chunk.iter().copied()))
                .exec(txn)
                .await?;
            removed += result.rows_affected;
        }
        Ok(removed)
    }

    /// Commit on success, roll back on error
    async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn save(&self, user: User) -> AppResult<User> {
        user.require_names()?;

        let txn = self.db.begin().await.map_err(AppError::from)?;
        let result = Self::persist(&txn, user).await;
        let saved = Self::finish(txn, result).await?;

        debug!(id = ?saved.id, "Saved user");
        Ok(saved)
    }

    async fn save_all(&self, users: Vec<User>) -> AppResult<Vec<User>> {
        for user in &users {
            user.require_names()?;
        }

        let txn = self.db.begin().await.map_err(AppError::from)?;
        let result = Self::persist_all(&txn, users).await;
        let saved = Self::finish(txn, result).await?;

        debug!(count = saved.len(), "Saved users");
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        debug!(id, rows = result.rows_affected, "Deleted user");
        Ok(())
    }

    async fn delete_all_of(&self, users: &[User]) -> AppResult<u64> {
        let ids: Vec<i64> = users.iter().filter_map(|u| u.id).collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await.map_err(AppError::from)?;
        let result = Self::delete_ids(&txn, &ids).await;
        let removed = Self::finish(txn, result).await?;

        debug!(rows = removed, "Deleted users");
        Ok(removed)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = UserEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        debug!(rows = result.rows_affected, "Deleted all users");
        Ok(result.rows_affected)
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let count = UserEntity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn find_one(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        self.query(UserQuery::all()).await
    }

    async fn count(&self) -> AppResult<u64> {
        UserEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn query(&self, query: UserQuery) -> AppResult<Vec<User>> {
        debug!(?query, "Running user query");

        let models = query
            .into_select()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_first_name_order_by_last_name_asc(&self, name: &str) -> AppResult<Vec<User>> {
        self.query(UserQuery::first_name_equals(name).order_by_asc(UserColumn::LastName))
            .await
    }

    async fn get_by_first_name_like(&self, pattern: &str) -> AppResult<Vec<User>> {
        self.query(UserQuery::first_name_like(pattern)).await
    }
}
