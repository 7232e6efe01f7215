use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Post entity - a blog post owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: i32,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, user_id: i32) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            user_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_body(&self.title, &self.content)?;
        if self.user_id < 1 {
            return Err(ValidationError::InvalidUserId(self.user_id));
        }
        Ok(())
    }
}

/// The columns of a post that may change after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: String,
    pub content: String,
}

impl PostPatch {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_body(&self.title, &self.content)
    }
}

fn validate_body(title: &str, content: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::Required("Title"));
    }
    if content.is_empty() {
        return Err(ValidationError::Required("Content"));
    }
    Ok(())
}
