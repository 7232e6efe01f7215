//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory repositories only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - Argon2 password hashing

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;
#[cfg(feature = "auth")]
pub mod managers;

pub use database::{ConfigError, DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{Database, PostgresPostRepository, PostgresUserRepository};

#[cfg(feature = "auth")]
pub use auth::Argon2PasswordService;
#[cfg(feature = "auth")]
pub use managers::Managers;
