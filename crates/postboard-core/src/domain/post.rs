use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Post entity - a titled piece of content with an attached image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `creator_id`.
    pub fn new(creator_id: Uuid, title: String, content: String, image_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            title,
            content,
            image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` is the creator of this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }

    /// Overwrite title and content; the image only changes when one is given.
    pub fn revise(&mut self, title: String, content: String, image_url: Option<String>) {
        self.title = title;
        self.content = content;
        if let Some(image_url) = image_url {
            self.image_url = image_url;
        }
        self.updated_at = Utc::now();
    }
}

/// A post with its creator expanded.
#[derive(Debug, Clone)]
pub struct PostWithCreator {
    pub post: Post,
    pub creator: User,
}
