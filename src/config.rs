use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::{DEFAULT_INTEREST_RATE, Role};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "LOANDESK_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,

    pub loans: LoanConfig,

    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/loandesk.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request.
    pub session_idle_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 6789,
            cors_allowed_origins: vec![
                "http://localhost:6789".to_string(),
                "http://127.0.0.1:6789".to_string(),
            ],
            secure_cookies: true,
            session_idle_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

/// Values used when the settings record is first created, plus lifecycle
/// switches that are not stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfig {
    pub min_amount: f64,

    pub max_amount: f64,

    /// Flat interest charged per month of the term.
    pub interest_rate: f64,

    pub bkash_number: String,

    pub nagad_number: String,

    pub rocket_number: String,

    /// Share of the principal quoted as the down payment.
    pub down_payment_ratio: f64,

    /// Restrict staff status writes to Pending -> Approved/Rejected and
    /// Approved -> Paid. Off by default: any status may be written.
    pub enforce_status_flow: bool,
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            min_amount: 5000.0,
            max_amount: 100_000.0,
            interest_rate: DEFAULT_INTEREST_RATE,
            bkash_number: "01XXXXXXXXX".to_string(),
            nagad_number: "01XXXXXXXXX".to_string(),
            rocket_number: "01XXXXXXXXX".to_string(),
            down_payment_ratio: 0.10,
            enforce_status_flow: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUserConfig {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Create the seed accounts on startup when their email is not taken.
    pub enabled: bool,

    pub users: Vec<SeedUserConfig>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            users: vec![
                SeedUserConfig {
                    full_name: "Super Admin".to_string(),
                    email: "super@example.com".to_string(),
                    password: "password".to_string(),
                    phone_number: None,
                    address: None,
                    role: Role::SuperAdmin,
                },
                SeedUserConfig {
                    full_name: "Admin User".to_string(),
                    email: "admin@example.com".to_string(),
                    password: "password".to_string(),
                    phone_number: None,
                    address: None,
                    role: Role::Admin,
                },
                SeedUserConfig {
                    full_name: "John Doe".to_string(),
                    email: "user@example.com".to_string(),
                    password: "password".to_string(),
                    phone_number: Some("01712345678".to_string()),
                    address: Some("123 Dhaka Road, Dhaka".to_string()),
                    role: Role::User,
                },
            ],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(explicit);
            info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return Self::load_from_path(&path);
        }

        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("loandesk").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".loandesk").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!(
                "min_db_connections ({}) cannot exceed max_db_connections ({})",
                self.general.min_db_connections,
                self.general.max_db_connections
            );
        }

        if !self.loans.interest_rate.is_finite() || self.loans.interest_rate < 0.0 {
            anyhow::bail!(
                "Interest rate must be a non-negative number, got {}",
                self.loans.interest_rate
            );
        }

        if !(0.0..=1.0).contains(&self.loans.down_payment_ratio) {
            anyhow::bail!(
                "Down payment ratio must be between 0 and 1, got {}",
                self.loans.down_payment_ratio
            );
        }

        for seed in &self.bootstrap.users {
            if seed.email.trim().is_empty() || seed.password.is_empty() {
                anyhow::bail!("Seed users need both an email and a password");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.loans.min_amount, 5000.0);
        assert_eq!(config.loans.max_amount, 100_000.0);
        assert_eq!(config.loans.interest_rate, 0.03);
        assert!(!config.loans.enforce_status_flow);
        assert_eq!(config.bootstrap.users.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[loans]"));
        assert!(toml_str.contains("[[bootstrap.users]]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [loans]
            max_amount = 250000.0
            enforce_status_flow = true

            [bootstrap]
            enabled = false
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.loans.max_amount, 250_000.0);
        assert_eq!(config.loans.min_amount, 5000.0);
        assert!(config.loans.enforce_status_flow);
        assert!(!config.bootstrap.enabled);
        assert_eq!(config.server.port, 6789);
    }

    #[test]
    fn test_seed_role_parses() {
        let toml_str = r#"
            [[bootstrap.users]]
            full_name = "Ops"
            email = "ops@example.com"
            password = "secret"
            role = "admin"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bootstrap.users.len(), 1);
        assert_eq!(config.bootstrap.users[0].role, Role::Admin);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.loans.down_payment_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.loans.interest_rate = -0.01;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.min_db_connections = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.bootstrap.users[0].password.clear();
        assert!(config.validate().is_err());
    }
}
