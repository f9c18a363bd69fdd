//! User Repository Library
//!
//! Data access for the `USER` table: a SeaORM-backed [`UserRepository`]
//! over an embedded SQLite database, its schema migrations, and the
//! commands behind the `user-repository` binary.

pub mod fixtures;
pub mod infra;
pub mod repository;

use tracing::info;

use common::{AppError, AppResult, DatabaseConfig};

use crate::infra::Database;
use crate::repository::{UserQuery, UserRepository, UserStore};

/// Connect, apply migrations and build a repository over the pool.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<(Database, UserStore)> {
    let db = Database::connect(config).await?;
    let store = UserStore::new(db.get_connection());
    Ok((db, store))
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &DatabaseConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Data commands exposed by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCommand {
    /// Insert the `John{i}` / `Doe{i}` fixture
    Seed { count: usize },
    /// Print users matching the query as JSON lines
    List { query: UserQuery },
    /// Print the number of stored users
    Count,
    /// Delete every user
    Purge,
}

/// Run a data command against a freshly opened store.
pub async fn run_command(config: &DatabaseConfig, command: RepositoryCommand) -> AppResult<()> {
    if config.is_in_memory() {
        tracing::warn!("Using an in-memory database; changes are discarded on exit");
    }
    let (_db, store) = open_store(config).await?;

    match command {
        RepositoryCommand::Seed { count } => {
            let saved = fixtures::seed(&store, count).await?;
            println!("Seeded {} users", saved.len());
        }
        RepositoryCommand::List { query } => {
            for user in store.query(query).await? {
                let line = serde_json::to_string(&user)
                    .map_err(|e| AppError::internal(format!("Failed to encode user: {}", e)))?;
                println!("{}", line);
            }
        }
        RepositoryCommand::Count => {
            println!("{}", store.count().await?);
        }
        RepositoryCommand::Purge => {
            let removed = store.delete_all().await?;
            info!(removed, "Deleted all users");
        }
    }

    Ok(())
}
