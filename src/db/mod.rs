use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::{BootstrapConfig, LoanConfig, SecurityConfig};
use crate::domain::{LoanStatus, Role};
use crate::models::{
    LoanApplication, LoanFilter, LoanLimits, LoanSettings, NewLoanApplication, NewUser,
    PaymentNumbers, User,
};

pub mod migrator;
pub mod repositories;

/// Current time in the format every timestamp column uses.
///
/// Fixed-width UTC, so lexical order matches chronological order.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        if in_memory {
            // Every SQLite connection gets its own in-memory database; keep
            // exactly one alive for the lifetime of the pool.
            opt.max_connections(1)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(u64::from(u32::MAX)))
                .max_lifetime(Duration::from_secs(u64::from(u32::MAX)));
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn loan_repo(&self) -> repositories::loan::LoanRepository {
        repositories::loan::LoanRepository::new(self.conn.clone())
    }

    fn settings_repo(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(
        &self,
        new_user: &NewUser,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().create(new_user, security).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().get_by_api_key(api_key).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn update_user_role(&self, id: i32, role: Role) -> Result<Option<User>> {
        self.user_repo().update_role(id, role).await
    }

    /// Create each configured seed account whose email is not taken yet.
    /// Returns how many accounts were created.
    pub async fn seed_users(
        &self,
        bootstrap: &BootstrapConfig,
        security: &SecurityConfig,
    ) -> Result<usize> {
        if !bootstrap.enabled {
            return Ok(0);
        }

        let mut created = 0;
        for seed in &bootstrap.users {
            if self.get_user_by_email(&seed.email).await?.is_some() {
                info!(email = %seed.email, "Seed user already exists");
                continue;
            }

            let new_user = NewUser {
                full_name: seed.full_name.clone(),
                email: seed.email.clone(),
                password: seed.password.clone(),
                phone_number: seed.phone_number.clone(),
                address: seed.address.clone(),
                role: seed.role,
            };

            if self.create_user(&new_user, security).await?.is_some() {
                info!(email = %seed.email, role = %seed.role, "Seed user created");
                created += 1;
            }
        }

        Ok(created)
    }

    // Loan applications

    pub async fn insert_loan(&self, application: &NewLoanApplication) -> Result<i32> {
        self.loan_repo().insert(application).await
    }

    pub async fn get_loan(&self, id: i32) -> Result<Option<LoanApplication>> {
        self.loan_repo().get(id).await
    }

    pub async fn list_loans(&self, filter: LoanFilter) -> Result<Vec<LoanApplication>> {
        self.loan_repo().list(filter).await
    }

    pub async fn update_loan_status(
        &self,
        id: i32,
        status: LoanStatus,
        changed_at: Option<String>,
    ) -> Result<bool> {
        self.loan_repo().update_status(id, status, changed_at).await
    }

    // Settings

    pub async fn get_settings(&self, defaults: &LoanConfig) -> Result<LoanSettings> {
        self.settings_repo().get_or_create(defaults).await
    }

    pub async fn update_loan_limits(
        &self,
        limits: LoanLimits,
        defaults: &LoanConfig,
    ) -> Result<LoanSettings> {
        self.settings_repo().update_limits(limits, defaults).await
    }

    pub async fn update_payment_numbers(
        &self,
        numbers: &PaymentNumbers,
        defaults: &LoanConfig,
    ) -> Result<LoanSettings> {
        self.settings_repo()
            .update_payment_numbers(numbers, defaults)
            .await
    }
}
