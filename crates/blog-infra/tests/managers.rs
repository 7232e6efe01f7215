//! Entity manager behaviour over the in-memory repositories and real Argon2
//! hashing.

use std::sync::Arc;

use blog_core::domain::{LoginCredentials, NewPost, PostPatch, UserPatch, UserValidation};
use blog_core::{DomainError, PostManager, UserManager, ValidationError};
use blog_infra::{Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository};

struct Fixture {
    users: UserManager,
    posts: PostManager,
}

fn fixture() -> Fixture {
    let user_repo = Arc::new(InMemoryUserRepository::new());
    let post_repo = Arc::new(InMemoryPostRepository::new());
    let passwords = Arc::new(Argon2PasswordService::new());

    Fixture {
        users: UserManager::new(user_repo.clone(), passwords),
        posts: PostManager::new(post_repo, user_repo),
    }
}

fn alice() -> UserPatch {
    UserPatch::new("alice", "alice@example.com", "correct horse")
}

#[tokio::test]
async fn stored_password_is_never_the_plaintext() {
    let fx = fixture();

    let created = fx.users.create(alice()).await.unwrap();
    let found = fx.users.find_by_id(created.id).await.unwrap();

    assert_ne!(found.password_hash, "correct horse");
    assert!(fx.users.verify_password(&found.password_hash, "correct horse").is_ok());
}

#[tokio::test]
async fn login_validation_ignores_name_but_needs_password() {
    let fx = fixture();

    let ok = UserValidation::from_action("login", "", "a@b.com", "pw").unwrap();
    assert!(fx.users.validate(&ok).is_ok());

    let missing = UserValidation::from_action("login", "alice", "a@b.com", "").unwrap();
    assert!(matches!(
        fx.users.validate(&missing),
        Err(DomainError::Validation(ValidationError::Required("Password")))
    ));
}

#[tokio::test]
async fn update_validation_checks_email_syntax() {
    let fx = fixture();

    let bad = UserValidation::Update(UserPatch::new("alice", "not-an-email", "pw"));
    assert!(matches!(
        fx.users.validate(&bad),
        Err(DomainError::Validation(ValidationError::InvalidEmail(_)))
    ));

    let good = UserValidation::Update(UserPatch::new("alice", "a@b.com", "pw"));
    assert!(fx.users.validate(&good).is_ok());
}

#[tokio::test]
async fn unknown_validation_action_is_rejected() {
    let err = UserValidation::from_action("promote", "alice", "a@b.com", "pw").unwrap_err();

    assert!(matches!(err, DomainError::UnsupportedAction(_)));
}

#[tokio::test]
async fn post_for_unknown_user_is_a_reference_error() {
    let fx = fixture();

    let err = fx
        .posts
        .create(NewPost::new("Hello", "World", 99))
        .await
        .unwrap_err();

    match err {
        DomainError::Reference { id, source, .. } => {
            assert_eq!(id, 99);
            assert!(matches!(*source, DomainError::NotFound { id: 99, .. }));
        }
        other => panic!("expected reference error, got {other:?}"),
    }
    assert!(fx.posts.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn post_for_existing_user_is_created() {
    let fx = fixture();
    let owner = fx.users.create(alice()).await.unwrap();

    let post = fx
        .posts
        .create(NewPost::new("Hello", "World", owner.id))
        .await
        .unwrap();

    assert_eq!(post.user_id, owner.id);
    assert_eq!(fx.posts.find_by_id(post.id).await.unwrap().title, "Hello");
}

#[tokio::test]
async fn deleting_missing_rows_reports_zero() {
    let fx = fixture();

    assert_eq!(fx.users.delete(404).await.unwrap(), 0);
    assert_eq!(fx.posts.delete(404).await.unwrap(), 0);
}

#[tokio::test]
async fn update_always_rehashes_the_password() {
    let fx = fixture();
    let created = fx.users.create(alice()).await.unwrap();

    let updated = fx.users.update(alice(), created.id).await.unwrap();

    assert_ne!(updated.password_hash, created.password_hash);
    assert!(updated.updated_at >= created.updated_at);
    assert!(
        fx.users
            .verify_password(&updated.password_hash, "correct horse")
            .is_ok()
    );
}

#[tokio::test]
async fn duplicate_email_is_a_constraint_error() {
    let fx = fixture();
    fx.users.create(alice()).await.unwrap();

    let err = fx
        .users
        .create(UserPatch::new("alice2", "alice@example.com", "pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Constraint(ref msg) if msg.contains("users_email_key")));
}

#[tokio::test]
async fn duplicate_post_title_is_a_constraint_error() {
    let fx = fixture();
    let owner = fx.users.create(alice()).await.unwrap();
    fx.posts
        .create(NewPost::new("Hello", "World", owner.id))
        .await
        .unwrap();

    let err = fx
        .posts
        .create(NewPost::new("Hello", "Again", owner.id))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Constraint(ref msg) if msg.contains("posts_title_key")));
    assert_eq!(fx.posts.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn updating_a_missing_row_with_taken_values_is_not_found() {
    let fx = fixture();
    let owner = fx.users.create(alice()).await.unwrap();
    fx.posts
        .create(NewPost::new("Hello", "World", owner.id))
        .await
        .unwrap();

    assert!(matches!(
        fx.users
            .update(UserPatch::new("zed", "alice@example.com", "pw"), 999)
            .await,
        Err(DomainError::NotFound { entity_type: "User", id: 999 })
    ));
    assert!(matches!(
        fx.posts.update(PostPatch::new("Hello", "Body"), 999).await,
        Err(DomainError::NotFound { entity_type: "Post", id: 999 })
    ));
}

#[tokio::test]
async fn find_all_on_empty_table_is_empty() {
    let fx = fixture();

    assert!(fx.users.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_rows_are_not_found() {
    let fx = fixture();

    assert!(matches!(
        fx.users.find_by_id(7).await,
        Err(DomainError::NotFound { entity_type: "User", id: 7 })
    ));
    assert!(matches!(
        fx.posts.update(PostPatch::new("t", "c"), 7).await,
        Err(DomainError::NotFound { entity_type: "Post", id: 7 })
    ));
    assert!(matches!(
        fx.users.update(alice(), 7).await,
        Err(DomainError::NotFound { entity_type: "User", id: 7 })
    ));
}

#[tokio::test]
async fn post_update_keeps_owner() {
    let fx = fixture();
    let owner = fx.users.create(alice()).await.unwrap();
    let post = fx
        .posts
        .create(NewPost::new("Hello", "World", owner.id))
        .await
        .unwrap();

    let updated = fx
        .posts
        .update(PostPatch::new("Hello again", "More"), post.id)
        .await
        .unwrap();

    assert_eq!(updated.title, "Hello again");
    assert_eq!(updated.content, "More");
    assert_eq!(updated.user_id, owner.id);
}

#[tokio::test]
async fn deleting_a_user_leaves_their_posts() {
    let fx = fixture();
    let owner = fx.users.create(alice()).await.unwrap();
    let post = fx
        .posts
        .create(NewPost::new("Hello", "World", owner.id))
        .await
        .unwrap();

    assert_eq!(fx.users.delete(owner.id).await.unwrap(), 1);

    assert_eq!(fx.posts.find_by_id(post.id).await.unwrap().user_id, owner.id);
}

#[tokio::test]
async fn authenticate_accepts_only_the_right_password() {
    let fx = fixture();
    let created = fx.users.create(alice()).await.unwrap();

    let user = fx
        .users
        .authenticate(LoginCredentials::new("alice@example.com", "correct horse"))
        .await
        .unwrap();
    assert_eq!(user.id, created.id);

    let wrong = fx
        .users
        .authenticate(LoginCredentials::new("alice@example.com", "battery staple"))
        .await;
    assert!(matches!(wrong, Err(DomainError::InvalidCredentials)));

    let unknown = fx
        .users
        .authenticate(LoginCredentials::new("nobody@example.com", "correct horse"))
        .await;
    assert!(matches!(unknown, Err(DomainError::InvalidCredentials)));
}
