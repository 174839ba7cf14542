use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::domain::StatusPolicy;
use crate::services::{
    AuthService, LoanService, SeaOrmAuthService, SeaOrmLoanService, SeaOrmSettingsService,
    SeaOrmUserService, SettingsService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub settings_service: Arc<dyn SettingsService>,

    pub loan_service: Arc<dyn LoanService>,
}

impl SharedState {
    /// Connect the store, apply migrations and create the seed accounts.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        store
            .seed_users(&config.bootstrap, &config.security)
            .await?;

        Ok(Self::from_store(config, store))
    }

    /// Wire the services around an already connected store.
    #[must_use]
    pub fn from_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let user_service = Arc::new(SeaOrmUserService::new(store.clone())) as Arc<dyn UserService>;

        let settings_service = Arc::new(SeaOrmSettingsService::new(
            store.clone(),
            config.loans.clone(),
        )) as Arc<dyn SettingsService>;

        let loan_service = Arc::new(SeaOrmLoanService::new(
            store.clone(),
            settings_service.clone(),
            StatusPolicy::from_enforce_flag(config.loans.enforce_status_flow),
            config.loans.down_payment_ratio,
        )) as Arc<dyn LoanService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            user_service,
            settings_service,
            loan_service,
        }
    }
}
