use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::{DomainError, ValidationError};

/// User entity - a persisted user row.
///
/// `password_hash` only ever holds the output of a password hasher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plaintext input for creating or updating a user.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserPatch {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check name, password and email, in that order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name)?;
        require("Password", &self.password)?;
        validate_email(&self.email)
    }

    /// Swap the plaintext password for its hash.
    pub fn into_record(self, password_hash: String) -> UserRecord {
        UserRecord {
            name: self.name,
            email: self.email,
            password_hash,
        }
    }
}

// Keep plaintext passwords out of debug output.
impl fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPatch")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Input for a login attempt.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Password", &self.password)?;
        validate_email(&self.email)
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The mutable user columns as they are written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Which rule set a user input is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationAction {
    Update,
    Login,
}

impl FromStr for ValidationAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "update" => Ok(Self::Update),
            "login" => Ok(Self::Login),
            _ => Err(DomainError::UnsupportedAction(s.to_string())),
        }
    }
}

/// A user input tagged with the rule set it must satisfy.
#[derive(Debug, Clone)]
pub enum UserValidation {
    Update(UserPatch),
    Login(LoginCredentials),
}

impl UserValidation {
    /// Build a validation target from an action name, as sent by
    /// string-driven callers. Unknown actions are rejected here.
    pub fn from_action(
        action: &str,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(match action.parse::<ValidationAction>()? {
            ValidationAction::Update => Self::Update(UserPatch::new(name, email, password)),
            ValidationAction::Login => Self::Login(LoginCredentials::new(email, password)),
        })
    }

    pub fn action(&self) -> ValidationAction {
        match self {
            Self::Update(_) => ValidationAction::Update,
            Self::Login(_) => ValidationAction::Login,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Update(patch) => patch.validate(),
            Self::Login(credentials) => credentials.validate(),
        }
    }
}

/// Mask an email address for logging: `jane@example.com` becomes
/// `j***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    require("Email", email)?;
    if !email.validate_email() {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}
