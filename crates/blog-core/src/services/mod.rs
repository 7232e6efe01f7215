//! Entity managers - validation and persistence for each aggregate.
//!
//! Each manager is handed its collaborators at construction; there is no
//! process-wide database handle.

mod post_service;
mod user_service;

pub use post_service::PostManager;
pub use user_service::UserManager;
