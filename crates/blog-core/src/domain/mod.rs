//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{NewPost, Post, PostPatch};
pub use user::{
    LoginCredentials, User, UserPatch, UserRecord, UserValidation, ValidationAction, mask_email,
};
