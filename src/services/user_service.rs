//! Domain service for staff-side account management.

use thiserror::Error;

use crate::domain::{AccessDenied, Caller, Role};
use crate::models::User;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Lists every account, ordered by id. Staff only.
    async fn list(&self, caller: &Caller) -> Result<Vec<User>, UserError>;

    /// Assigns a new role. `SuperAdmin` only.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Forbidden`] for any other caller (checked before
    /// the target is looked up) and [`UserError::NotFound`] for an unknown id.
    async fn change_role(&self, caller: &Caller, user_id: i32, role: Role)
    -> Result<User, UserError>;
}
