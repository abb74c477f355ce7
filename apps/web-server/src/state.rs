//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{
    GroupRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_core::services::{GroupService, PostService};
use yatube_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use yatube_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use yatube_infra::database::{
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Where the repositories keep their data.
#[derive(Clone)]
pub enum Storage {
    #[cfg(feature = "postgres")]
    Postgres(DatabaseConnections),
    Memory,
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "postgres")]
            Storage::Postgres(_) => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub groups: Arc<GroupService>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub login_url: String,
    pub storage: Storage,
}

impl AppState {
    /// Build the state against PostgreSQL when configured, else in memory.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let conn = connections.main.clone();
                    return Self::assemble(
                        config,
                        Arc::new(PostgresPostRepository::new(conn.clone())),
                        Arc::new(PostgresGroupRepository::new(conn.clone())),
                        Arc::new(PostgresUserRepository::new(conn)),
                        Storage::Postgres(connections),
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        Self::in_memory(InMemoryStore::new(), config)
    }

    /// State backed by `store`.
    pub fn in_memory(store: Arc<InMemoryStore>, config: &AppConfig) -> Self {
        Self::assemble(
            config,
            Arc::new(store.posts()),
            Arc::new(store.groups()),
            Arc::new(store.users()),
            Storage::Memory,
        )
    }

    fn assemble(
        config: &AppConfig,
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        storage: Storage,
    ) -> Self {
        tracing::info!(storage = storage.name(), "Application state initialized");

        Self {
            posts: Arc::new(PostService::new(posts, groups.clone(), users.clone())),
            groups: Arc::new(GroupService::new(groups)),
            users,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            login_url: config.login_url.clone(),
            storage,
        }
    }
}
