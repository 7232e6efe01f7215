//! In-memory repositories - used when no database is configured, and as test
//! doubles for the entity managers.
//!
//! They enforce the same unique columns as the SQL schema and hand out
//! ids the way a serial column does. Data is lost on process restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blog_core::domain::{NewPost, Post, PostPatch, User, UserRecord};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, UserRepository};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn unique_violation(constraint: &str) -> RepoError {
    RepoError::Constraint(format!(
        "duplicate key value violates unique constraint \"{constraint}\""
    ))
}

/// In-memory `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `record` if another row (not `id`) already holds its name or email.
    fn check_unique(
        table: &Table<User>,
        record: &UserRecord,
        id: Option<i32>,
    ) -> Result<(), RepoError> {
        for user in table.rows.values().filter(|u| Some(u.id) != id) {
            if user.name == record.name {
                return Err(unique_violation("users_name_key"));
            }
            if user.email == record.email {
                return Err(unique_violation("users_email_key"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<u64, RepoError> {
        let removed = self.table.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, record: UserRecord) -> Result<User, RepoError> {
        let mut table = self.table.write().await;
        Self::check_unique(&table, &record, None)?;

        let now = Utc::now();
        let user = User {
            id: table.allocate_id(),
            name: record.name,
            email: record.email,
            password_hash: record.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, record: UserRecord) -> Result<Option<User>, RepoError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        Self::check_unique(&table, &record, Some(id))?;

        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        user.name = record.name;
        user.email = record.email;
        user.password_hash = record.password_hash;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }
}

/// In-memory `posts` table.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<Table<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(table: &Table<Post>, title: &str, id: Option<i32>) -> Result<(), RepoError> {
        if table
            .rows
            .values()
            .any(|p| Some(p.id) != id && p.title == title)
        {
            return Err(unique_violation("posts_title_key"));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<u64, RepoError> {
        let removed = self.table.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        Self::check_unique(&table, &new_post.title, None)?;

        let now = Utc::now();
        let post = Post {
            id: table.allocate_id(),
            title: new_post.title,
            content: new_post.content,
            user_id: new_post.user_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, id: i32, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        Self::check_unique(&table, &patch.title, Some(id))?;

        let Some(post) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        post.title = patch.title;
        post.content = patch.content;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, email: &str) -> UserRecord {
        UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repo = InMemoryUserRepository::new();

        let first = repo.insert(record("alice", "alice@example.com")).await.unwrap();
        let second = repo.insert(record("bob", "bob@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_name_violates_constraint() {
        let repo = InMemoryUserRepository::new();
        repo.insert(record("alice", "alice@example.com")).await.unwrap();

        let err = repo
            .insert(record("alice", "other@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Constraint(ref msg) if msg.contains("users_name_key")));
    }

    #[tokio::test]
    async fn update_may_keep_its_own_email() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(record("alice", "alice@example.com")).await.unwrap();

        let updated = repo
            .update(user.id, record("alice2", "alice@example.com"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "alice2");
    }

    #[tokio::test]
    async fn update_of_missing_row_reads_back_nothing() {
        let repo = InMemoryPostRepository::new();

        let result = repo.update(9, PostPatch::new("t", "c")).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn missing_user_with_taken_email_reads_back_nothing() {
        let repo = InMemoryUserRepository::new();
        repo.insert(record("alice", "alice@example.com")).await.unwrap();

        let result = repo
            .update(999, record("zed", "alice@example.com"))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn missing_post_with_taken_title_reads_back_nothing() {
        let repo = InMemoryPostRepository::new();
        repo.insert(NewPost::new("Hello", "c", 1)).await.unwrap();

        let result = repo.update(999, PostPatch::new("Hello", "c")).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_affected_rows() {
        let repo = InMemoryPostRepository::new();
        let post = repo.insert(NewPost::new("t", "c", 1)).await.unwrap();

        assert_eq!(repo.delete(post.id).await.unwrap(), 1);
        assert_eq!(repo.delete(post.id).await.unwrap(), 0);
    }
}
