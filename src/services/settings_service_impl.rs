//! `SeaORM` implementation of the `SettingsService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::LoanConfig;
use crate::db::Store;
use crate::domain::{Caller, Capability, authorize};
use crate::models::{LoanLimits, LoanSettings, PaymentNumbers};
use crate::services::settings_service::{SettingsError, SettingsService};

pub struct SeaOrmSettingsService {
    store: Store,
    defaults: LoanConfig,
}

impl SeaOrmSettingsService {
    #[must_use]
    pub const fn new(store: Store, defaults: LoanConfig) -> Self {
        Self { store, defaults }
    }
}

/// Limits are stored as given, inverted or not; only values that cannot be
/// persisted or compared are refused.
fn validate_limits(limits: LoanLimits) -> Result<(), SettingsError> {
    for (name, value) in [("min", limits.min), ("max", limits.max)] {
        if !value.is_finite() {
            return Err(SettingsError::Validation(format!(
                "Loan limit '{name}' must be a finite number"
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl SettingsService for SeaOrmSettingsService {
    async fn current(&self) -> Result<LoanSettings, SettingsError> {
        Ok(self.store.get_settings(&self.defaults).await?)
    }

    async fn set_limits(
        &self,
        caller: &Caller,
        limits: LoanLimits,
    ) -> Result<LoanSettings, SettingsError> {
        authorize(caller, Capability::UpdateSettings)?;
        validate_limits(limits)?;

        if limits.is_inverted() {
            warn!(
                min = limits.min,
                max = limits.max,
                "Loan limits saved with min above max; no amount will be accepted"
            );
        }

        let settings = self
            .store
            .update_loan_limits(limits, &self.defaults)
            .await?;

        info!(
            min = limits.min,
            max = limits.max,
            actor = caller.user_id,
            "Loan limits updated"
        );
        Ok(settings)
    }

    async fn set_payment_numbers(
        &self,
        caller: &Caller,
        numbers: PaymentNumbers,
    ) -> Result<LoanSettings, SettingsError> {
        authorize(caller, Capability::UpdateSettings)?;

        let settings = self
            .store
            .update_payment_numbers(&numbers, &self.defaults)
            .await?;

        info!(actor = caller.user_id, "Payment numbers updated");
        Ok(settings)
    }
}
