//! Wiring of the entity managers onto a storage backend.

use std::sync::Arc;

use blog_core::ports::{PasswordService, PostRepository, UserRepository};
use blog_core::{PostManager, UserManager};

use crate::auth::Argon2PasswordService;
use crate::database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use crate::database::{Database, DatabaseConfig, PostgresPostRepository, PostgresUserRepository};

/// Both entity managers, sharing one user repository.
#[derive(Clone)]
pub struct Managers {
    pub users: UserManager,
    pub posts: PostManager,
}

impl Managers {
    /// Managers over fresh in-memory tables.
    pub fn in_memory() -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        Self::assemble(users, Arc::new(InMemoryPostRepository::new()))
    }

    /// Managers over an open PostgreSQL pool.
    #[cfg(feature = "postgres")]
    pub fn postgres(db: &Database) -> Self {
        let users: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::shared(db.shared()));
        Self::assemble(users, Arc::new(PostgresPostRepository::shared(db.shared())))
    }

    /// Connect using `DATABASE_URL`. Without it, or if the connection
    /// fails, fall back to in-memory tables.
    #[cfg(feature = "postgres")]
    pub async fn from_env() -> Self {
        let config = match DatabaseConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}. Running without database (in-memory mode).");
                return Self::in_memory();
            }
        };

        match Database::init(&config).await {
            Ok(db) => Self::postgres(&db),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    fn assemble(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            users: UserManager::new(users.clone(), passwords),
            posts: PostManager::new(posts, users),
        }
    }
}
