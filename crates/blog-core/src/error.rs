//! Domain-level error types.

use thiserror::Error;

use crate::ports::AuthError;

/// Domain errors - what an entity manager hands back to its caller.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported action [{0}]")]
    UnsupportedAction(String),

    #[error("{entity_type} with ID [{id}] not found")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Referenced {entity_type} with ID [{id}] could not be resolved: {source}")]
    Reference {
        entity_type: &'static str,
        id: i32,
        #[source]
        source: Box<DomainError>,
    },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Auth(AuthError),

    #[error(transparent)]
    Repository(RepoError),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: i32) -> Self {
        Self::NotFound { entity_type, id }
    }

    /// Wrap a failed owner lookup as a dangling reference.
    pub fn reference(entity_type: &'static str, id: i32, source: DomainError) -> Self {
        Self::Reference {
            entity_type,
            id,
            source: Box::new(source),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Constraint(msg),
            other => DomainError::Repository(other),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => DomainError::InvalidCredentials,
            other => DomainError::Auth(other),
        }
    }
}

/// Repository-level errors.
///
/// "No such row" is not an error at this level: lookups return `Option` and
/// deletes return the affected count.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("{0}")]
    Constraint(String),
}

/// Input validation failures. Only the first violated rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is a required field")]
    Required(&'static str),

    #[error("Invalid email format: [{0}]")]
    InvalidEmail(String),

    #[error("A valid user ID is required, got [{0}]")]
    InvalidUserId(i32),
}
