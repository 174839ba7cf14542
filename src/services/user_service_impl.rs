//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::{Caller, Capability, Role, authorize};
use crate::models::User;
use crate::services::user_service::{UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list(&self, caller: &Caller) -> Result<Vec<User>, UserError> {
        authorize(caller, Capability::ListUsers)?;
        Ok(self.store.list_users().await?)
    }

    async fn change_role(
        &self,
        caller: &Caller,
        user_id: i32,
        role: Role,
    ) -> Result<User, UserError> {
        authorize(caller, Capability::ChangeUserRole)?;

        let before = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        let updated = self
            .store
            .update_user_role(user_id, role)
            .await?
            .ok_or(UserError::NotFound)?;

        info!(
            user_id,
            from = %before.role,
            to = %updated.role,
            actor = caller.user_id,
            "User role changed"
        );

        Ok(updated)
    }
}
