//! Feed operations: create, list, read, update and delete posts.

use uuid::Uuid;

use postboard_core::domain::{Post, PostWithCreator};
use postboard_core::validation::validate_post;
use postboard_core::{DomainError, DomainResult};
use postboard_shared::dto::{NewPostInput, PostUpdateInput};

use super::{POSTS_PER_PAGE, PostPage, Resolvers};
use crate::middleware::auth::AuthContext;

fn post_not_found() -> DomainError {
    DomainError::NotFound { entity_type: "Post" }
}

/// Ids that are not UUIDs cannot name any post.
fn parse_post_id(id: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| post_not_found())
}

fn ensure_owner(post: &Post, user_id: Uuid) -> DomainResult<()> {
    if post.is_owned_by(user_id) {
        Ok(())
    } else {
        tracing::warn!(post_id = %post.id, %user_id, "Rejected change to a post owned by someone else");
        Err(DomainError::Forbidden)
    }
}

impl Resolvers {
    /// Create a post owned by the current user.
    pub async fn create_post(
        &self,
        ctx: &AuthContext,
        input: NewPostInput,
    ) -> DomainResult<PostWithCreator> {
        let user_id = ctx.require()?;
        validate_post(&input.title, &input.content)?;

        let mut creator = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Invalid User".to_string()))?;

        let post = Post::new(creator.id, input.title, input.content, input.image_url);
        let post = self.posts.save(post).await?;
        creator.posts.push(post.id);

        tracing::info!(post_id = %post.id, user_id = %creator.id, "Post created");
        Ok(PostWithCreator { post, creator })
    }

    /// One page of the feed, newest first. Pages start at 1.
    pub async fn posts(&self, ctx: &AuthContext, page: Option<i32>) -> DomainResult<PostPage> {
        ctx.require()?;

        let page = page.filter(|p| *p >= 1).map_or(1, |p| p as u64);
        let total_posts = self.posts.count().await?;
        let posts = self
            .posts
            .find_page((page - 1) * POSTS_PER_PAGE, POSTS_PER_PAGE)
            .await?;

        Ok(PostPage { posts, total_posts })
    }

    /// A single post with its creator.
    pub async fn post(&self, ctx: &AuthContext, post_id: &str) -> DomainResult<PostWithCreator> {
        ctx.require()?;
        let post_id = parse_post_id(post_id)?;

        self.posts
            .find_with_creator(post_id)
            .await?
            .ok_or_else(post_not_found)
    }

    /// Overwrite a post the current user created.
    pub async fn update_post(
        &self,
        ctx: &AuthContext,
        post_id: &str,
        input: PostUpdateInput,
    ) -> DomainResult<PostWithCreator> {
        let user_id = ctx.require()?;
        let post_id = parse_post_id(post_id)?;

        let PostWithCreator { mut post, creator } = self
            .posts
            .find_with_creator(post_id)
            .await?
            .ok_or_else(post_not_found)?;
        ensure_owner(&post, user_id)?;
        validate_post(&input.title, &input.content)?;

        post.revise(input.title, input.content, input.image_url);
        let post = self.posts.save(post).await?;

        tracing::info!(post_id = %post.id, "Post updated");
        Ok(PostWithCreator { post, creator })
    }

    /// Delete a post the current user created, together with its image.
    pub async fn delete_post(&self, ctx: &AuthContext, post_id: &str) -> DomainResult<bool> {
        let user_id = ctx.require()?;
        let post_id = parse_post_id(post_id)?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(post_not_found)?;
        ensure_owner(&post, user_id)?;

        self.images.clear_image(&post.image_url).await?;
        self.posts.delete(post.id).await?;

        tracing::info!(post_id = %post.id, user_id = %user_id, "Post deleted");
        Ok(true)
    }
}
