use serde::{Deserialize, Serialize};

use crate::domain::{Caller, Role};

/// Account as stored, without the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub api_key: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    #[must_use]
    pub const fn caller(&self) -> Caller {
        Caller::new(self.id, self.role)
    }
}

/// Input for creating an account. The password is hashed by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: Role,
}

/// Normalize an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
