//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Both repositories share one [`InMemoryDatabase`], so a user's derived post
//! list always reflects the posts table.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use postboard_core::domain::{Post, PostWithCreator, User};
use postboard_core::error::RepoError;
use postboard_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Shared tables behind async locks.
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Ids of `user_id`'s posts, oldest first.
    fn post_ids_of(posts: &HashMap<Uuid, Post>, user_id: Uuid) -> Vec<Uuid> {
        let mut owned: Vec<&Post> = posts.values().filter(|p| p.creator_id == user_id).collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        owned.into_iter().map(|p| p.id).collect()
    }

    fn hydrate(posts: &HashMap<Uuid, Post>, user: &User) -> User {
        let mut user = user.clone();
        user.posts = Self::post_ids_of(posts, user.id);
        user
    }

    async fn with_creator(&self, post: Post) -> Result<PostWithCreator, RepoError> {
        let users = self.users.read().await;
        let posts = self.posts.read().await;
        let creator = users
            .get(&post.creator_id)
            .ok_or_else(|| {
                RepoError::Constraint(format!("post {} references a missing creator", post.id))
            })?;
        let creator = Self::hydrate(&posts, creator);
        Ok(PostWithCreator { post, creator })
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryUserRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.db.users.read().await;
        let posts = self.db.posts.read().await;
        Ok(users.get(&id).map(|u| InMemoryDatabase::hydrate(&posts, u)))
    }

    async fn save(&self, mut entity: User) -> Result<User, RepoError> {
        let mut users = self.db.users.write().await;
        if users
            .values()
            .any(|u| u.email == entity.email && u.id != entity.id)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        entity.posts.clear();
        users.insert(entity.id, entity.clone());
        drop(users);

        let posts = self.db.posts.read().await;
        Ok(InMemoryDatabase::hydrate(&posts, &entity))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut users = self.db.users.write().await;
        users.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)?;
        drop(users);

        // Mirrors the ON DELETE CASCADE of the posts table.
        self.db.posts.write().await.retain(|_, p| p.creator_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.db.users.read().await;
        let posts = self.db.posts.read().await;
        Ok(users
            .values()
            .find(|u| u.email == email)
            .map(|u| InMemoryDatabase::hydrate(&posts, u)))
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    db: Arc<InMemoryDatabase>,
}

impl InMemoryPostRepository {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.db.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        if !self.db.users.read().await.contains_key(&entity.creator_id) {
            return Err(RepoError::Constraint(format!(
                "creator {} does not exist",
                entity.creator_id
            )));
        }

        self.db
            .posts
            .write()
            .await
            .insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.db
            .posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.db.posts.read().await.len() as u64)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<PostWithCreator>, RepoError> {
        let mut page: Vec<Post> = self.db.posts.read().await.values().cloned().collect();
        page.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let page = page
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX));

        let mut result = Vec::new();
        for post in page {
            result.push(self.db.with_creator(post).await?);
        }
        Ok(result)
    }

    async fn find_with_creator(&self, id: Uuid) -> Result<Option<PostWithCreator>, RepoError> {
        let post = self.db.posts.read().await.get(&id).cloned();
        match post {
            Some(post) => Ok(Some(self.db.with_creator(post).await?)),
            None => Ok(None),
        }
    }
}
