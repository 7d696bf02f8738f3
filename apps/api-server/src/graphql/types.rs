//! GraphQL object and input types.

use async_graphql::{ID, InputObject, SimpleObject};
use chrono::{DateTime, SecondsFormat, Utc};

use postboard_core::domain::{PostWithCreator, User};
use postboard_shared::dto::{AuthPayload, NewPostInput, PostUpdateInput, UserInput};

use crate::resolvers::PostPage;

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Public view of a user. The password hash is never exposed.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "User")]
pub struct UserObject {
    #[graphql(name = "_id")]
    pub id: ID,
    pub name: String,
    pub email: String,
    pub status: String,
    /// Ids of the user's posts, oldest first.
    pub posts: Vec<ID>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            name: user.name,
            email: user.email,
            status: user.status,
            posts: user.posts.iter().map(|id| ID(id.to_string())).collect(),
            created_at: iso(user.created_at),
            updated_at: iso(user.updated_at),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Post")]
pub struct PostObject {
    #[graphql(name = "_id")]
    pub id: ID,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: UserObject,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostWithCreator> for PostObject {
    fn from(PostWithCreator { post, creator }: PostWithCreator) -> Self {
        Self {
            id: ID(post.id.to_string()),
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            creator: creator.into(),
            created_at: iso(post.created_at),
            updated_at: iso(post.updated_at),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct AuthData {
    pub token: String,
    pub user_id: ID,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

impl From<AuthPayload> for AuthData {
    fn from(payload: AuthPayload) -> Self {
        Self {
            token: payload.token,
            user_id: ID(payload.user_id),
            expires_in: i64::try_from(payload.expires_in).unwrap_or(i64::MAX),
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct PostData {
    pub posts: Vec<PostObject>,
    pub total_posts: i64,
}

impl From<PostPage> for PostData {
    fn from(page: PostPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(Into::into).collect(),
            total_posts: i64::try_from(page.total_posts).unwrap_or(i64::MAX),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UserInputData {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl From<UserInputData> for UserInput {
    fn from(input: UserInputData) -> Self {
        Self {
            name: input.name,
            email: input.email,
            password: input.password,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct PostInputData {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

impl From<PostInputData> for NewPostInput {
    fn from(input: PostInputData) -> Self {
        Self {
            title: input.title,
            content: input.content,
            image_url: input.image_url,
        }
    }
}

/// Post edits; leaving `imageUrl` out keeps the current image.
#[derive(InputObject, Debug)]
pub struct PostUpdateData {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl From<PostUpdateData> for PostUpdateInput {
    fn from(input: PostUpdateData) -> Self {
        Self {
            title: input.title,
            content: input.content,
            image_url: input.image_url,
        }
    }
}
