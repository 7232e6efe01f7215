//! Ports - trait definitions for external dependencies.
//! Infrastructure implements these; the entity managers only see the traits.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService};
pub use repository::{BaseRepository, PostRepository, UserRepository};
