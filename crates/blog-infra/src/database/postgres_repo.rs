//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use blog_core::domain::{NewPost, Post, PostPatch, User, UserRecord, mask_email};
use blog_core::error::RepoError;
use blog_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::error_mapping::map_db_err;
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, record: UserRecord) -> Result<User, RepoError> {
        tracing::debug!(email = %mask_email(&record.email), "Inserting user");

        let now = Utc::now();
        let model = user::ActiveModel {
            name: Set(record.name),
            email: Set(record.email),
            password: Set(record.password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: i32, record: UserRecord) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_id = id, "Updating user");

        let changes = user::ActiveModel {
            name: Set(record.name),
            email: Set(record.email),
            password: Set(record.password_hash),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        UserEntity::update_many()
            .set(changes)
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let refreshed = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(refreshed.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        tracing::debug!(user_id = new_post.user_id, "Inserting post");

        let now = Utc::now();
        let model = post::ActiveModel {
            title: Set(new_post.title),
            content: Set(new_post.content),
            user_id: Set(new_post.user_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: i32, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = id, "Updating post");

        let changes = post::ActiveModel {
            title: Set(patch.title),
            content: Set(patch.content),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        PostEntity::update_many()
            .set(changes)
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let refreshed = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(refreshed.map(Into::into))
    }
}
