use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use postboard_core::domain::{Post, PostWithCreator, User};
use postboard_core::error::RepoError;
use postboard_core::ports::{
    BaseRepository, ImageStore, PostRepository, StorageError, TokenService, UserRepository,
};
use postboard_core::DomainError;
use postboard_infra::{
    BcryptPasswordService, InMemoryDatabase, InMemoryPostRepository, InMemoryUserRepository,
    JwtConfig, JwtTokenService, LocalImageStore,
};
use postboard_shared::dto::{LoginInput, NewPostInput, PostUpdateInput, UserInput};

use super::*;
use crate::middleware::auth::AuthContext;

/// Wraps a repository and counts every call that reaches it.
struct Counted<R> {
    inner: R,
    calls: Arc<AtomicUsize>,
}

impl<R> Counted<R> {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for Counted<InMemoryUserRepository> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        self.hit();
        self.inner.save(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.hit();
        BaseRepository::<User, Uuid>::delete(&self.inner, id).await
    }
}

#[async_trait]
impl UserRepository for Counted<InMemoryUserRepository> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.hit();
        self.inner.find_by_email(email).await
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for Counted<InMemoryPostRepository> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.hit();
        self.inner.save(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.hit();
        BaseRepository::<Post, Uuid>::delete(&self.inner, id).await
    }
}

#[async_trait]
impl PostRepository for Counted<InMemoryPostRepository> {
    async fn count(&self) -> Result<u64, RepoError> {
        self.hit();
        self.inner.count().await
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<PostWithCreator>, RepoError> {
        self.hit();
        self.inner.find_page(offset, limit).await
    }

    async fn find_with_creator(&self, id: Uuid) -> Result<Option<PostWithCreator>, RepoError> {
        self.hit();
        self.inner.find_with_creator(id).await
    }
}

/// Records every image it is asked to clear, with the number of posts stored at that moment.
struct RecordingImageStore {
    posts: InMemoryPostRepository,
    cleared: Mutex<Vec<(String, u64)>>,
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn clear_image(&self, path: &str) -> Result<(), StorageError> {
        let stored = self.posts.count().await.unwrap();
        self.cleared.lock().unwrap().push((path.to_string(), stored));
        Ok(())
    }
}

struct Harness {
    resolvers: Resolvers,
    users: InMemoryUserRepository,
    posts: InMemoryPostRepository,
    tokens: Arc<JwtTokenService>,
    images: Arc<RecordingImageStore>,
    calls: Arc<AtomicUsize>,
}

impl Harness {
    fn new() -> Self {
        let db = InMemoryDatabase::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "resolver-test-secret".to_string(),
            expiration_secs: 3600,
            issuer: "postboard-test".to_string(),
        }));
        let images = Arc::new(RecordingImageStore {
            posts: InMemoryPostRepository::new(db.clone()),
            cleared: Mutex::default(),
        });

        let resolvers = Resolvers::new(
            Arc::new(Counted {
                inner: InMemoryUserRepository::new(db.clone()),
                calls: calls.clone(),
            }),
            Arc::new(Counted {
                inner: InMemoryPostRepository::new(db.clone()),
                calls: calls.clone(),
            }),
            tokens.clone(),
            Arc::new(BcryptPasswordService::new(4)),
            images.clone(),
        );

        Self {
            resolvers,
            users: InMemoryUserRepository::new(db.clone()),
            posts: InMemoryPostRepository::new(db),
            tokens,
            images,
            calls,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn cleared(&self) -> Vec<String> {
        self.images
            .cleared
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Post counts observed by each image cleanup.
    fn posts_at_cleanup(&self) -> Vec<u64> {
        self.images
            .cleared
            .lock()
            .unwrap()
            .iter()
            .map(|(_, stored)| *stored)
            .collect()
    }

    async fn register(&self, email: &str) -> User {
        self.resolvers
            .create_user(UserInput {
                name: "Tester".into(),
                email: email.into(),
                password: "pass1".into(),
            })
            .await
            .unwrap()
    }

    async fn create_post(&self, owner: &User, title: &str) -> Post {
        self.resolvers
            .create_post(
                &AuthContext::authenticated(owner.id),
                NewPostInput {
                    title: title.into(),
                    content: "Some content".into(),
                    image_url: "images/original.png".into(),
                },
            )
            .await
            .unwrap()
            .post
    }
}

fn update(title: &str, image_url: Option<&str>) -> PostUpdateInput {
    PostUpdateInput {
        title: title.into(),
        content: "Updated content".into(),
        image_url: image_url.map(String::from),
    }
}

fn login(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn registration_with_invalid_input_writes_nothing() {
    let h = Harness::new();

    let err = h
        .resolvers
        .create_user(UserInput {
            name: "Tester".into(),
            email: "not-an-email".into(),
            password: "1234".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(422));
    assert_eq!(err.field_errors().len(), 2);
    assert_eq!(h.calls(), 0);
}

#[tokio::test]
async fn registration_hashes_password_and_sets_default_status() {
    let h = Harness::new();

    let user = h.register("a@test.com").await;

    assert_ne!(user.password_hash, "pass1");
    assert_eq!(user.status, postboard_core::domain::DEFAULT_STATUS);
    assert!(h.users.find_by_email("a@test.com").await.unwrap().is_some());
}

#[tokio::test]
async fn end_to_end_register_and_login() {
    let h = Harness::new();

    let user = h.register("a@test.com").await;

    let duplicate = h
        .resolvers
        .create_user(UserInput {
            name: "Other".into(),
            email: "a@test.com".into(),
            password: "pass1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, DomainError::Duplicate(_)));
    assert_eq!(duplicate.status_code(), None);
    let stored = h.users.find_by_email("a@test.com").await.unwrap().unwrap();
    assert_eq!(stored.id, user.id);
    assert_eq!(stored.name, "Tester");

    let auth = h.resolvers.login(login("a@test.com", "pass1")).await.unwrap();
    assert_eq!(auth.user_id, user.id.to_string());
    let claims = h.tokens.validate_token(&auth.token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.email, "a@test.com");
    assert_eq!(claims.exp - claims.iat, 3600);
    assert_eq!(auth.expires_in, 3600);

    let wrong = h
        .resolvers
        .login(login("a@test.com", "wrong-password"))
        .await
        .unwrap_err();
    assert_eq!(wrong.status_code(), Some(401));
    assert_eq!(wrong.to_string(), "Password incorrect");
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthorized() {
    let h = Harness::new();

    let err = h
        .resolvers
        .login(login("nobody@test.com", "pass1"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "User not found");
}

#[tokio::test]
async fn gated_operations_reject_anonymous_callers_before_persistence() {
    let h = Harness::new();
    let anon = AuthContext::anonymous();
    let id = Uuid::new_v4().to_string();

    let results = vec![
        h.resolvers
            .create_post(
                &anon,
                NewPostInput {
                    title: "A title".into(),
                    content: "Some content".into(),
                    image_url: "images/a.png".into(),
                },
            )
            .await
            .map(|_| ()),
        h.resolvers.posts(&anon, None).await.map(|_| ()),
        h.resolvers.post(&anon, &id).await.map(|_| ()),
        h.resolvers
            .update_post(&anon, &id, update("A title", None))
            .await
            .map(|_| ()),
        h.resolvers.delete_post(&anon, &id).await.map(|_| ()),
        h.resolvers.user(&anon).await.map(|_| ()),
        h.resolvers
            .update_status(&anon, "Busy".into())
            .await
            .map(|_| ()),
    ];

    for result in results {
        assert_eq!(result.unwrap_err().status_code(), Some(401));
    }
    assert_eq!(h.calls(), 0);
    assert!(h.cleared().is_empty());
}

#[tokio::test]
async fn create_post_validates_before_touching_the_store() {
    let h = Harness::new();
    let user = h.register("a@test.com").await;
    let before = h.calls();

    let err = h
        .resolvers
        .create_post(
            &AuthContext::authenticated(user.id),
            NewPostInput {
                title: "Hey".into(),
                content: "".into(),
                image_url: "images/a.png".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(422));
    let messages: Vec<_> = err.field_errors().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["Title is invalid", "Content is invalid"]);
    assert_eq!(h.calls(), before);
}

#[tokio::test]
async fn create_post_for_unknown_user_is_unauthorized() {
    let h = Harness::new();

    let err = h
        .resolvers
        .create_post(
            &AuthContext::authenticated(Uuid::new_v4()),
            NewPostInput {
                title: "A title".into(),
                content: "Some content".into(),
                image_url: "images/a.png".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "Invalid User");
}

#[tokio::test]
async fn create_post_links_post_to_creator() {
    let h = Harness::new();
    let user = h.register("a@test.com").await;

    let created = h
        .resolvers
        .create_post(
            &AuthContext::authenticated(user.id),
            NewPostInput {
                title: "A title".into(),
                content: "Some content".into(),
                image_url: "images/a.png".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(created.post.creator_id, user.id);
    assert_eq!(created.creator.posts, vec![created.post.id]);
    let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.posts, vec![created.post.id]);
}

#[tokio::test]
async fn post_lookup_returns_not_found_for_missing_post() {
    let h = Harness::new();
    let user = h.register("a@test.com").await;

    let err = h
        .resolvers
        .post(&AuthContext::authenticated(user.id), &Uuid::new_v4().to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn update_by_non_owner_is_forbidden_and_changes_nothing() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let intruder = h.register("intruder@test.com").await;
    let post = h.create_post(&owner, "Original title").await;

    let err = h
        .resolvers
        .update_post(
            &AuthContext::authenticated(intruder.id),
            &post.id.to_string(),
            update("Hijacked title", Some("images/evil.png")),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    let stored = h.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Original title");
    assert_eq!(stored.image_url, "images/original.png");
}

#[tokio::test]
async fn update_checks_ownership_before_validation() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let intruder = h.register("intruder@test.com").await;
    let post = h.create_post(&owner, "Original title").await;

    let err = h
        .resolvers
        .update_post(
            &AuthContext::authenticated(intruder.id),
            &post.id.to_string(),
            update("", None),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn update_keeps_image_unless_one_is_supplied() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let ctx = AuthContext::authenticated(owner.id);
    let post = h.create_post(&owner, "Original title").await;

    let kept = h
        .resolvers
        .update_post(&ctx, &post.id.to_string(), update("Second title", None))
        .await
        .unwrap();
    assert_eq!(kept.post.title, "Second title");
    assert_eq!(kept.post.content, "Updated content");
    assert_eq!(kept.post.image_url, "images/original.png");

    let replaced = h
        .resolvers
        .update_post(
            &ctx,
            &post.id.to_string(),
            update("Third title", Some("images/new.png")),
        )
        .await
        .unwrap();
    assert_eq!(replaced.post.image_url, "images/new.png");
    assert_eq!(replaced.creator.id, owner.id);

    let stored = h.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Third title");
    assert_eq!(stored.image_url, "images/new.png");
}

#[tokio::test]
async fn update_with_invalid_fields_is_rejected() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let post = h.create_post(&owner, "Original title").await;

    let err = h
        .resolvers
        .update_post(
            &AuthContext::authenticated(owner.id),
            &post.id.to_string(),
            update("Hi", None),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(422));
    let stored = h.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Original title");
}

#[tokio::test]
async fn delete_by_non_owner_is_forbidden() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let intruder = h.register("intruder@test.com").await;
    let post = h.create_post(&owner, "Original title").await;

    let err = h
        .resolvers
        .delete_post(&AuthContext::authenticated(intruder.id), &post.id.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert!(h.posts.find_by_id(post.id).await.unwrap().is_some());
    assert!(h.cleared().is_empty());
}

#[tokio::test]
async fn delete_removes_post_reference_and_image() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let keep = h.create_post(&owner, "Keep this one").await;
    let post = h.create_post(&owner, "Delete this one").await;

    let deleted = h
        .resolvers
        .delete_post(&AuthContext::authenticated(owner.id), &post.id.to_string())
        .await
        .unwrap();

    assert!(deleted);
    assert!(h.posts.find_by_id(post.id).await.unwrap().is_none());
    let stored = h.users.find_by_id(owner.id).await.unwrap().unwrap();
    assert_eq!(stored.posts, vec![keep.id]);
    assert_eq!(h.cleared(), vec!["images/original.png".to_string()]);
}

#[tokio::test]
async fn delete_clears_image_before_removing_the_record() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    h.create_post(&owner, "Keep this one").await;
    let post = h.create_post(&owner, "Delete this one").await;

    h.resolvers
        .delete_post(&AuthContext::authenticated(owner.id), &post.id.to_string())
        .await
        .unwrap();

    assert_eq!(h.posts_at_cleanup(), vec![2]);
    assert_eq!(h.posts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn owner_can_delete_posts_with_unusual_image_paths() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("public");
    std::fs::create_dir_all(root.join("images")).unwrap();
    std::fs::write(root.join("images/a.png"), b"png").unwrap();

    let db = InMemoryDatabase::new();
    let posts = InMemoryPostRepository::new(db.clone());
    let resolvers = Resolvers::new(
        Arc::new(InMemoryUserRepository::new(db.clone())),
        Arc::new(InMemoryPostRepository::new(db)),
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "resolver-test-secret".to_string(),
            expiration_secs: 3600,
            issuer: "postboard-test".to_string(),
        })),
        Arc::new(BcryptPasswordService::new(4)),
        Arc::new(LocalImageStore::new(&root)),
    );
    let owner = resolvers
        .create_user(UserInput {
            name: "Owner".into(),
            email: "owner@test.com".into(),
            password: "pass1".into(),
        })
        .await
        .unwrap();
    let ctx = AuthContext::authenticated(owner.id);

    for image_url in ["/images/a.png", "../escape.png"] {
        let post = resolvers
            .create_post(
                &ctx,
                NewPostInput {
                    title: "A title".into(),
                    content: "Some content".into(),
                    image_url: image_url.into(),
                },
            )
            .await
            .unwrap()
            .post;

        assert!(resolvers.delete_post(&ctx, &post.id.to_string()).await.unwrap());
        assert!(posts.find_by_id(post.id).await.unwrap().is_none());
    }
    assert!(!root.join("images/a.png").exists());
}

#[tokio::test]
async fn delete_missing_post_is_not_found() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;

    let err = h
        .resolvers
        .delete_post(&AuthContext::authenticated(owner.id), &Uuid::new_v4().to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(h.cleared().is_empty());
}

#[tokio::test]
async fn feed_pages_hold_two_posts_newest_first() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let ctx = AuthContext::authenticated(owner.id);

    // Explicit timestamps keep the ordering deterministic.
    let base = Utc::now();
    let mut expected = Vec::new();
    for i in 0..5 {
        let mut post = Post::new(
            owner.id,
            format!("Post number {i}"),
            "Some content".into(),
            "images/a.png".into(),
        );
        post.created_at = base + TimeDelta::seconds(i);
        expected.push(h.posts.save(post).await.unwrap().id);
    }
    expected.reverse();

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = h.resolvers.posts(&ctx, Some(page)).await.unwrap();
        assert_eq!(result.total_posts, 5);
        assert!(result.posts.len() <= POSTS_PER_PAGE as usize);
        seen.extend(result.posts.iter().map(|p| p.post.id));
    }
    assert_eq!(seen, expected);

    let beyond = h.resolvers.posts(&ctx, Some(4)).await.unwrap();
    assert!(beyond.posts.is_empty());
}

#[tokio::test]
async fn feed_defaults_to_first_page() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let ctx = AuthContext::authenticated(owner.id);
    h.create_post(&owner, "Only post").await;

    for page in [None, Some(0), Some(-3)] {
        let result = h.resolvers.posts(&ctx, page).await.unwrap();
        assert_eq!(result.posts.len(), 1);
        assert_eq!(result.posts[0].creator.id, owner.id);
    }
}

#[tokio::test]
async fn user_and_status_round_trip() {
    let h = Harness::new();
    let owner = h.register("owner@test.com").await;
    let ctx = AuthContext::authenticated(owner.id);

    let updated = h.resolvers.update_status(&ctx, "Writing".into()).await.unwrap();
    assert_eq!(updated.status, "Writing");

    let fetched = h.resolvers.user(&ctx).await.unwrap();
    assert_eq!(fetched.status, "Writing");
    assert_eq!(fetched.email, "owner@test.com");
}

#[tokio::test]
async fn user_lookup_for_unknown_id_is_not_found() {
    let h = Harness::new();

    let err = h
        .resolvers
        .user(&AuthContext::authenticated(Uuid::new_v4()))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
}
