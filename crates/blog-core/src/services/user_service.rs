//! User entity manager.

use std::sync::{Arc, OnceLock};

use crate::domain::{LoginCredentials, User, UserPatch, UserValidation, mask_email};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, UserRepository};

const ENTITY: &str = "User";

/// Hashed once and verified against on logins for unknown emails, so those
/// cost the same Argon2 work as a wrong password.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-emails";

/// Owns user records: validation, password hashing and CRUD.
#[derive(Clone)]
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    decoy_hash: Arc<OnceLock<String>>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            users,
            passwords,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Check an input against the rule set it is tagged with.
    pub fn validate(&self, input: &UserValidation) -> Result<(), DomainError> {
        input.validate().map_err(DomainError::from)
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, DomainError> {
        Ok(self.passwords.hash(plaintext)?)
    }

    /// Succeeds only when `candidate` hashes to `hash`.
    pub fn verify_password(&self, hash: &str, candidate: &str) -> Result<(), DomainError> {
        if self.passwords.verify(candidate, hash)? {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }

    /// Validate, hash the password and insert.
    pub async fn create(&self, patch: UserPatch) -> Result<User, DomainError> {
        patch.validate()?;
        let hash = self.hash_password(&patch.password)?;

        let user = self.users.insert(patch.into_record(hash)).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    /// Overwrite name, email and password of user `id`.
    ///
    /// The password is hashed again on every call, even if it did not change.
    pub async fn update(&self, patch: UserPatch, id: i32) -> Result<User, DomainError> {
        patch.validate()?;
        let hash = self.hash_password(&patch.password)?;

        let user = self
            .users
            .update(id, patch.into_record(hash))
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;
        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Returns the number of rows removed; a missing user is `Ok(0)`.
    pub async fn delete(&self, id: i32) -> Result<u64, DomainError> {
        let removed = self.users.delete(id).await?;
        tracing::info!(user_id = id, removed, "User delete executed");
        Ok(removed)
    }

    /// Resolve login credentials to a user.
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn authenticate(&self, credentials: LoginCredentials) -> Result<User, DomainError> {
        credentials.validate()?;

        let Some(user) = self.users.find_by_email(&credentials.email).await? else {
            self.verify_decoy(&credentials.password);
            tracing::warn!(email = %mask_email(&credentials.email), "Login for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        match self.verify_password(&user.password_hash, &credentials.password) {
            Ok(()) => Ok(user),
            Err(DomainError::InvalidCredentials) => {
                tracing::warn!(user_id = user.id, "Login with wrong password");
                Err(DomainError::InvalidCredentials)
            }
            Err(err) => Err(err),
        }
    }

    /// Run a verification whose result is discarded.
    fn verify_decoy(&self, candidate: &str) {
        let hash = match self.decoy_hash.get() {
            Some(hash) => hash,
            None => match self.passwords.hash(DECOY_PASSWORD) {
                Ok(hash) => self.decoy_hash.get_or_init(|| hash),
                Err(err) => {
                    tracing::error!(error = %err, "Could not hash decoy password");
                    return;
                }
            },
        };
        let _ = self.passwords.verify(candidate, hash);
    }
}
