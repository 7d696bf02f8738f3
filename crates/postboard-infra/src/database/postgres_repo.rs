//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use postboard_core::domain::{PostWithCreator, User};
use postboard_core::error::RepoError;
use postboard_core::ports::{BaseRepository, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

type UserTable = PostgresBaseRepository<UserEntity>;

/// PostgreSQL user repository.
///
/// Wraps the generic table repository and fills in each user's post list.
pub struct PostgresUserRepository {
    table: UserTable,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self {
            table: UserTable::new(db),
        }
    }

    async fn with_posts(&self, user: Option<User>) -> Result<Option<User>, RepoError> {
        let Some(mut user) = user else {
            return Ok(None);
        };
        let mut by_creator = post_ids_by_creator(&self.table.db, vec![user.id]).await?;
        user.posts = by_creator.remove(&user.id).unwrap_or_default();
        Ok(Some(user))
    }
}

/// Post ids grouped by creator, oldest first.
async fn post_ids_by_creator(
    db: &DbConn,
    mut creator_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<Uuid>>, RepoError> {
    creator_ids.sort();
    creator_ids.dedup();
    if creator_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, Uuid)> = PostEntity::find()
        .select_only()
        .column(post::Column::CreatorId)
        .column(post::Column::Id)
        .filter(post::Column::CreatorId.is_in(creator_ids))
        .order_by_asc(post::Column::CreatedAt)
        .into_tuple()
        .all(db)
        .await
        .map_err(query_error)?;

    let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (creator_id, post_id) in rows {
        grouped.entry(creator_id).or_default().push(post_id);
    }
    Ok(grouped)
}

fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let user = BaseRepository::<User, Uuid>::find_by_id(&self.table, id).await?;
        self.with_posts(user).await
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let user = BaseRepository::<User, Uuid>::save(&self.table, entity).await?;
        self.with_posts(Some(user))
            .await?
            .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        BaseRepository::<User, Uuid>::delete(&self.table, id).await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.table.db)
            .await
            .map_err(query_error)?;

        self.with_posts(result.map(Into::into)).await
    }
}

fn dangling_creator(post_id: Uuid) -> RepoError {
    RepoError::Constraint(format!("post {post_id} references a missing creator"))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(query_error)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<PostWithCreator>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let creator_ids = rows.iter().map(|(p, _)| p.creator_id).collect();
        let post_ids = post_ids_by_creator(&self.db, creator_ids).await?;

        rows.into_iter()
            .map(|(post, creator)| {
                let creator = creator.ok_or_else(|| dangling_creator(post.id))?;
                let mut creator: User = creator.into();
                creator.posts = post_ids.get(&creator.id).cloned().unwrap_or_default();
                Ok(PostWithCreator {
                    post: post.into(),
                    creator,
                })
            })
            .collect()
    }

    async fn find_with_creator(&self, id: Uuid) -> Result<Option<PostWithCreator>, RepoError> {
        let Some((post, creator)) = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        let creator = creator.ok_or_else(|| dangling_creator(post.id))?;
        let mut creator: User = creator.into();
        creator.posts = post_ids_by_creator(&self.db, vec![creator.id])
            .await?
            .remove(&creator.id)
            .unwrap_or_default();

        Ok(Some(PostWithCreator {
            post: post.into(),
            creator,
        }))
    }
}
