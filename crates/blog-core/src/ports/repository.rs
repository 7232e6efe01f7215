use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostPatch, User, UserRecord};
use crate::error::RepoError;

/// Operations every table supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Fetch every row. An empty table yields an empty vector.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Point lookup by primary key.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete by primary key, returning the number of rows removed.
    async fn delete(&self, id: ID) -> Result<u64, RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    /// Insert a row and return it with its assigned id and timestamps.
    async fn insert(&self, record: UserRecord) -> Result<User, RepoError>;

    /// Overwrite name, email, password and `updated_at` for `id`, then read
    /// the row back. `None` if no row exists at read-back.
    async fn update(&self, id: i32, record: UserRecord) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite title, content and `updated_at` for `id`, then read the row
    /// back.
    async fn update(&self, id: i32, patch: PostPatch) -> Result<Option<Post>, RepoError>;
}
