//! Application state - shared across all handlers.

use std::sync::Arc;

use postboard_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use postboard_infra::database::DatabaseConnections;
use postboard_infra::{
    Argon2PasswordService, BcryptPasswordService, InMemoryDatabase, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService, LocalImageStore,
};

#[cfg(feature = "postgres")]
use postboard_infra::database::{DatabaseConfig, PostgresPostRepository, PostgresUserRepository};

use crate::config::{AppConfig, PasswordHasherKind};
use crate::resolvers::Resolvers;

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub resolvers: Resolvers,
    /// Verifies bearer tokens for the auth context.
    pub tokens: Arc<dyn TokenService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, (users, posts)) = match &config.database {
            Some(db_config) => connect(db_config).await,
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, (users, posts)) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (None, in_memory())
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = match config.password_hasher {
            PasswordHasherKind::Bcrypt => Arc::new(BcryptPasswordService::new(config.bcrypt_cost)),
            PasswordHasherKind::Argon2 => Arc::new(Argon2PasswordService::new()),
        };
        let images = Arc::new(LocalImageStore::new(config.image_root.clone()));

        tracing::info!(
            hasher = ?config.password_hasher,
            image_root = %config.image_root.display(),
            "Application state initialized"
        );

        Self {
            resolvers: Resolvers::new(users, posts, Arc::clone(&tokens), passwords, images),
            tokens,
            db,
        }
    }

    /// Assemble state from prebuilt collaborators.
    #[cfg(test)]
    pub fn from_parts(resolvers: Resolvers, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            resolvers,
            tokens,
            db: None,
        }
    }

    /// Storage backend name reported by the health check.
    pub fn storage_mode(&self) -> &'static str {
        if self.db.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}

fn in_memory() -> Repositories {
    let db = InMemoryDatabase::new();
    (
        Arc::new(InMemoryUserRepository::new(db.clone())),
        Arc::new(InMemoryPostRepository::new(db)),
    )
}

#[cfg(feature = "postgres")]
async fn connect(config: &DatabaseConfig) -> (Option<Arc<DatabaseConnections>>, Repositories) {
    match DatabaseConnections::init(config).await {
        Ok(connections) => {
            let conn = Arc::new(connections);
            let users = Arc::new(PostgresUserRepository::new(conn.main.clone()));
            let posts = Arc::new(PostgresPostRepository::new(conn.main.clone()));
            (Some(conn), (users, posts))
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            (None, in_memory())
        }
    }
}
