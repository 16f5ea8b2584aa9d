//! Application state - shared across all handlers.

use std::sync::Arc;

use forum_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use forum_core::{AccountService, ForumRules, ForumService};
use forum_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use forum_infra::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub forum: Arc<ForumService>,
    /// Which backend the repositories talk to, reported by the health check.
    pub storage: &'static str,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

fn in_memory_repositories() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        #[cfg(feature = "postgres")]
        let state = {
            let (db, (users, posts)) = Self::connect(config).await;
            let storage = if db.is_some() { "postgres" } else { "memory" };
            let mut state =
                Self::assemble(users, posts, passwords, tokens, config.rules.clone(), storage);
            state.db = db;
            state
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            let (users, posts) = in_memory_repositories();
            Self::assemble(users, posts, passwords, tokens, config.rules.clone(), "memory")
        };

        tracing::info!(storage = state.storage, "Application state initialized");
        state
    }

    /// In-memory state with the given credential adapters.
    #[cfg(test)]
    pub fn in_memory(
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        rules: ForumRules,
    ) -> Self {
        let (users, posts) = in_memory_repositories();
        Self::assemble(users, posts, passwords, tokens, rules, "memory")
    }

    fn assemble(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        rules: ForumRules,
        storage: &'static str,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(users, passwords, tokens)),
            forum: Arc::new(ForumService::new(posts, rules)),
            storage,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Open the database and run migrations, falling back to memory on failure.
    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (None, in_memory_repositories());
        };

        let connections = match DatabaseConnections::init(db_config).await {
            Ok(connections) => connections,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return (None, in_memory_repositories());
            }
        };

        if config.run_migrations {
            if let Err(e) = Migrator::up(&connections.main, None).await {
                tracing::error!("Failed to run migrations: {}. Using in-memory fallback.", e);
                return (None, in_memory_repositories());
            }
            tracing::info!("Migrations applied");
        }

        let users: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(connections.main.clone()));
        let posts: Arc<dyn PostRepository> =
            Arc::new(PostgresPostRepository::new(connections.main.clone()));
        (Some(Arc::new(connections)), (users, posts))
    }
}
