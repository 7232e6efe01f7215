//! # Blog Core
//!
//! The domain layer of the blog data-access layer.
//! Entities, validation rules, repository ports and the entity managers that
//! tie them together. No database or hashing code lives here; those arrive
//! through the ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError, ValidationError};
pub use services::{PostManager, UserManager};
