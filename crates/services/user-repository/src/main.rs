//! User Repository - command-line access to the USER table.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::{DatabaseConfig, DEFAULT_LOG_LEVEL};
use domain::DEFAULT_FIXTURE_SIZE;
use user_repository_lib::repository::{UserColumn, UserQuery};
use user_repository_lib::{MigrateAction, RepositoryCommand};

#[derive(Parser)]
#[command(name = "user-repository")]
#[command(about = "User data access over an embedded SQLite database")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Database URL (defaults to a private in-memory database)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Insert generated users
    Seed {
        #[arg(long, default_value_t = DEFAULT_FIXTURE_SIZE)]
        count: usize,
    },
    /// List users, optionally filtered by first name
    List {
        /// Exact first name, results ordered by last name
        #[arg(long, conflicts_with = "like")]
        first_name: Option<String>,
        /// First name pattern where `%` matches any sequence
        #[arg(long)]
        like: Option<String>,
    },
    /// Print the number of stored users
    Count,
    /// Delete every user
    Purge,
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() {
    // Load .env before RUST_LOG and the database settings are read
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DatabaseConfig::from_env();
    if let Some(url) = cli.database_url {
        config = config.with_url(url);
    }
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            user_repository_lib::run_migrations(&config, migrate_action).await
        }
        Commands::Seed { count } => {
            user_repository_lib::run_command(&config, RepositoryCommand::Seed { count }).await
        }
        Commands::List { first_name, like } => {
            let query = match (first_name, like) {
                (Some(name), _) => {
                    UserQuery::first_name_equals(name).order_by_asc(UserColumn::LastName)
                }
                (None, Some(pattern)) => UserQuery::first_name_like(pattern),
                (None, None) => UserQuery::all(),
            };
            user_repository_lib::run_command(&config, RepositoryCommand::List { query }).await
        }
        Commands::Count => {
            user_repository_lib::run_command(&config, RepositoryCommand::Count).await
        }
        Commands::Purge => {
            user_repository_lib::run_command(&config, RepositoryCommand::Purge).await
        }
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!(code = e.code(), "Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
