//! Generated users for seeding and tests.

use common::{AppError, AppResult};
use domain::{User, FIXTURE_FIRST_NAME_PREFIX, FIXTURE_LAST_NAME_PREFIX};

use crate::repository::UserRepository;

/// Build `count` transient users named `John{i}` / `Doe{i}`
pub fn test_users(count: usize) -> Vec<User> {
    (0..count)
        .map(|i| {
            User::new(
                format!("{}{}", FIXTURE_FIRST_NAME_PREFIX, i),
                format!("{}{}", FIXTURE_LAST_NAME_PREFIX, i),
            )
        })
        .collect()
}

/// Batch-save `count` fixture users and return them with their ids.
///
/// Fails if storage hands back a user without an id.
pub async fn seed(repo: &dyn UserRepository, count: usize) -> AppResult<Vec<User>> {
    let saved = repo.save_all(test_users(count)).await?;

    if let Some(user) = saved.iter().find(|u| u.is_new()) {
        return Err(AppError::internal(format!(
            "seeded user was not assigned an id: {}",
            user
        )));
    }

    tracing::info!(count = saved.len(), "Seeded users");
    Ok(saved)
}
