//! Domain service for registration, login and token lookup.

use thiserror::Error;

use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Self-service sign-up. The account always starts with the `User` role.
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a `User`-role account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a missing name, malformed email
    /// or empty password, and [`AuthError::EmailTaken`] if the email is in use.
    async fn register(&self, registration: Registration) -> Result<User, AuthError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves a session token to its account, if any.
    async fn authenticate_token(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Loads an account by id.
    async fn get_user(&self, user_id: i32) -> Result<User, AuthError>;
}
