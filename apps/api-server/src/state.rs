//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use quill_core::ports::{PostRepository, RatingRepository, UserRepository};
use quill_core::services::{PostService, RatingService, UserService};
use quill_infra::InMemoryStore;
use quill_infra::database::{
    self, PostgresPostRepository, PostgresRatingRepository, PostgresUserRepository,
};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Which storage backend the services run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub ratings: RatingService,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store
    /// when no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory(Arc::new(InMemoryStore::new()));
        };

        match database::connect(db_config).await {
            Ok(conn) => {
                if config.auto_migrate {
                    if let Err(e) = Migrator::up(&conn, None).await {
                        tracing::error!("Failed to apply migrations: {}", e);
                    } else {
                        tracing::info!("Migrations applied");
                    }
                }
                Self::postgres(conn)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory(Arc::new(InMemoryStore::new()))
            }
        }
    }

    /// State backed by PostgreSQL.
    pub fn postgres(conn: DatabaseConnection) -> Self {
        let conn = Arc::new(conn);
        Self::from_repositories(
            Arc::new(PostgresUserRepository::new(conn.clone())),
            Arc::new(PostgresPostRepository::new(conn.clone())),
            Arc::new(PostgresRatingRepository::new(conn)),
            Storage::Postgres,
        )
    }

    /// State backed by a single in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self::from_repositories(store.clone(), store.clone(), store, Storage::Memory)
    }

    fn from_repositories(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        ratings: Arc<dyn RatingRepository>,
        storage: Storage,
    ) -> Self {
        let user_service = UserService::new(users.clone());

        tracing::info!(storage = storage.as_str(), "Application state initialized");

        Self {
            posts: PostService::new(user_service, posts.clone()),
            ratings: RatingService::new(users, posts, ratings),
            storage,
        }
    }
}
