//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::Role;
use crate::models::{NewUser, User, normalize_email};
use crate::services::auth_service::{AuthError, AuthService, Registration};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

fn validate_registration(registration: &Registration) -> Result<(), AuthError> {
    if registration.full_name.trim().is_empty() {
        return Err(AuthError::Validation("Full name is required".to_string()));
    }

    let email = normalize_email(&registration.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    if registration.password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }

    Ok(())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        validate_registration(&registration)?;

        let new_user = NewUser {
            full_name: registration.full_name,
            email: registration.email,
            password: registration.password,
            phone_number: registration.phone_number.filter(|s| !s.trim().is_empty()),
            address: registration.address.filter(|s| !s.trim().is_empty()),
            role: Role::User,
        };

        let user = self
            .store
            .create_user(&new_user, &self.security)
            .await?
            .ok_or(AuthError::EmailTaken)?;

        info!(user_id = user.id, email = %user.email, "User registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .verify_user_password(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn authenticate_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.store.get_user_by_api_key(token).await?)
    }

    async fn get_user(&self, user_id: i32) -> Result<User, AuthError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
