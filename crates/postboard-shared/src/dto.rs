//! Data Transfer Objects - argument bundles and payloads of the operations.

use serde::{Deserialize, Serialize};

/// Arguments for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Arguments for login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Arguments for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPostInput {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

/// Arguments for updating a post. A missing `image_url` keeps the current image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdateInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub token: String,
    pub user_id: String,
    pub expires_in: u64,
}
