use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use tracing::info;

use crate::config::LoanConfig;
use crate::db::now_timestamp;
use crate::entities::{prelude::*, settings};
use crate::models::{LoanLimits, LoanSettings, PaymentNumbers};

/// Repository for the singleton settings row
pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: settings::Model) -> LoanSettings {
        LoanSettings {
            limits: LoanLimits {
                min: model.loan_min,
                max: model.loan_max,
            },
            payment_numbers: PaymentNumbers {
                bkash: model.bkash_number,
                nagad: model.nagad_number,
                rocket: model.rocket_number,
            },
            interest_rate: model.interest_rate,
            updated_at: model.updated_at,
        }
    }

    /// Fetch the settings row, inserting one built from `defaults` first if
    /// none exists. Concurrent callers race on the insert harmlessly.
    async fn ensure(&self, defaults: &LoanConfig) -> Result<settings::Model> {
        if let Some(model) = Settings::find_by_id(settings::SINGLETON_ID)
            .one(&self.conn)
            .await
            .context("Failed to query settings")?
        {
            return Ok(model);
        }

        let now = now_timestamp();
        let active = settings::ActiveModel {
            id: Set(settings::SINGLETON_ID),
            loan_min: Set(defaults.min_amount),
            loan_max: Set(defaults.max_amount),
            bkash_number: Set(defaults.bkash_number.clone()),
            nagad_number: Set(defaults.nagad_number.clone()),
            rocket_number: Set(defaults.rocket_number.clone()),
            interest_rate: Set(defaults.interest_rate),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let inserted = Settings::insert(active)
            .on_conflict(
                OnConflict::column(settings::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to create default settings")?;

        if inserted > 0 {
            info!("Created default settings record");
        }

        Settings::find_by_id(settings::SINGLETON_ID)
            .one(&self.conn)
            .await
            .context("Failed to query settings")?
            .ok_or_else(|| anyhow::anyhow!("Settings record missing after creation"))
    }

    pub async fn get_or_create(&self, defaults: &LoanConfig) -> Result<LoanSettings> {
        self.ensure(defaults).await.map(Self::map_model)
    }

    pub async fn update_limits(
        &self,
        limits: LoanLimits,
        defaults: &LoanConfig,
    ) -> Result<LoanSettings> {
        let model = self.ensure(defaults).await?;

        let mut active: settings::ActiveModel = model.into();
        active.loan_min = Set(limits.min);
        active.loan_max = Set(limits.max);
        active.updated_at = Set(now_timestamp());
        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update loan limits")?;

        Ok(Self::map_model(updated))
    }

    /// Full replace of all three channel numbers.
    pub async fn update_payment_numbers(
        &self,
        numbers: &PaymentNumbers,
        defaults: &LoanConfig,
    ) -> Result<LoanSettings> {
        let model = self.ensure(defaults).await?;

        let mut active: settings::ActiveModel = model.into();
        active.bkash_number = Set(numbers.bkash.clone());
        active.nagad_number = Set(numbers.nagad.clone());
        active.rocket_number = Set(numbers.rocket.clone());
        active.updated_at = Set(now_timestamp());
        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update payment numbers")?;

        Ok(Self::map_model(updated))
    }
}
