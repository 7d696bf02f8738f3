use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostWithCreator, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
///
/// Every user returned carries its derived `posts` list.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Total number of posts.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Posts newest first, skipping `offset` and returning at most `limit`.
    async fn find_page(&self, offset: u64, limit: u64)
    -> Result<Vec<PostWithCreator>, RepoError>;

    /// A single post with its creator expanded.
    async fn find_with_creator(&self, id: Uuid) -> Result<Option<PostWithCreator>, RepoError>;
}
