//! Domain service for the singleton loan settings record.
//!
//! Reads are open to everyone and create the record with configured defaults
//! on first access. Writes are `SuperAdmin` only.

use thiserror::Error;

use crate::domain::{AccessDenied, Caller};
use crate::models::{LoanLimits, LoanSettings, PaymentNumbers};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SettingsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SettingsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait SettingsService: Send + Sync {
    /// The full record, created with defaults if absent.
    async fn current(&self) -> Result<LoanSettings, SettingsError>;

    async fn limits(&self) -> Result<LoanLimits, SettingsError> {
        Ok(self.current().await?.limits)
    }

    async fn payment_numbers(&self) -> Result<PaymentNumbers, SettingsError> {
        Ok(self.current().await?.payment_numbers)
    }

    /// Replaces `{min, max}`. An inverted range is stored as given.
    async fn set_limits(
        &self,
        caller: &Caller,
        limits: LoanLimits,
    ) -> Result<LoanSettings, SettingsError>;

    /// Replaces all three channel numbers at once.
    async fn set_payment_numbers(
        &self,
        caller: &Caller,
        numbers: PaymentNumbers,
    ) -> Result<LoanSettings, SettingsError>;
}
