//! Post entity manager.

use std::sync::Arc;

use crate::domain::{NewPost, Post, PostPatch};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

const ENTITY: &str = "Post";

/// Owns post records. Reads the user table only to check post ownership.
#[derive(Clone)]
pub struct PostManager {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostManager {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub fn validate(&self, post: &NewPost) -> Result<(), DomainError> {
        post.validate().map_err(DomainError::from)
    }

    /// Validate, confirm the owner exists, then insert.
    pub async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        post.validate()?;
        self.ensure_owner(post.user_id).await?;

        let post = self.posts.insert(post).await?;
        tracing::info!(post_id = post.id, user_id = post.user_id, "Post created");
        Ok(post)
    }

    pub async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    /// Overwrite title and content of post `id`. The owner never changes.
    pub async fn update(&self, patch: PostPatch, id: i32) -> Result<Post, DomainError> {
        patch.validate()?;

        let post = self
            .posts
            .update(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;
        tracing::info!(post_id = id, "Post updated");
        Ok(post)
    }

    /// Returns the number of rows removed; a missing post is `Ok(0)`.
    pub async fn delete(&self, id: i32) -> Result<u64, DomainError> {
        let removed = self.posts.delete(id).await?;
        tracing::info!(post_id = id, removed, "Post delete executed");
        Ok(removed)
    }

    async fn ensure_owner(&self, user_id: i32) -> Result<(), DomainError> {
        let lookup = match self.users.find_by_id(user_id).await {
            Ok(Some(_)) => return Ok(()),
            Ok(None) => DomainError::not_found("User", user_id),
            Err(err) => err.into(),
        };
        Err(DomainError::reference("User", user_id, lookup))
    }
}
