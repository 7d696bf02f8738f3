//! Resolver dispatch - one function per operation exposed to callers.
//!
//! Every operation except registration and login starts with
//! [`AuthContext::require`](crate::middleware::auth::AuthContext::require).
//! Failures are returned as [`DomainError`](postboard_core::DomainError)s and
//! formatted by the GraphQL layer.

mod auth;
mod posts;
mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use postboard_core::domain::PostWithCreator;
use postboard_core::ports::{
    ImageStore, PasswordService, PostRepository, TokenService, UserRepository,
};

/// Fixed feed page size.
pub const POSTS_PER_PAGE: u64 = 2;

/// One page of the feed.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<PostWithCreator>,
    pub total_posts: u64,
}

/// The collaborators every operation is composed from.
#[derive(Clone)]
pub struct Resolvers {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
    images: Arc<dyn ImageStore>,
}

impl Resolvers {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            users,
            posts,
            tokens,
            passwords,
            images,
        }
    }
}
