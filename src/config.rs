//! Application configuration
//!
//! Loaded from a TOML file. Every section and field has a default, so an
//! absent file or a partial file is valid.
//!
//! ```toml
//! [server]
//! api_port = 8080
//!
//! [database]
//! url = "sqlite:///var/lib/cleaning-booking/booking.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [security]
//! jwt_secret = "..."
//!
//! [booking]
//! sales_tax_rate = 0.088
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::PricingPolicy;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;
use crate::shared::money::ratio_from_f64;
use crate::shared::InfraError;

/// Environment variable holding an explicit config path
pub const CONFIG_ENV: &str = "BOOKING_CONFIG";

const APP_DIR: &str = "cleaning-booking";
const CONFIG_FILE: &str = "config.toml";

/// `$BOOKING_CONFIG`, else `~/.config/cleaning-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub pool: PoolConfig,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
            pool: PoolConfig::default(),
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            max_connections: db.max_connections,
            min_connections: db.min_connections,
            connect_timeout_secs: db.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    /// "json" or "pretty"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub jwt_issuer: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_hours: jwt.expiration_hours,
            jwt_issuer: jwt.issuer,
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"***")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("jwt_issuer", &self.jwt_issuer)
            .finish()
    }
}

/// Pricing constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub sales_tax_rate: f64,
    pub duration_tolerance_minutes: i32,
    pub studio_price: f64,
    pub studio_duration_minutes: i32,
    pub minutes_per_maid: i32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            sales_tax_rate: 0.088,
            duration_tolerance_minutes: 5,
            studio_price: 20.0,
            studio_duration_minutes: 20,
            minutes_per_maid: 360,
        }
    }
}

impl AppConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        let b = &self.booking;
        if !(0.0..1.0).contains(&b.sales_tax_rate) {
            return Err(InfraError::Config(format!(
                "booking.sales_tax_rate must be in [0, 1), got {}",
                b.sales_tax_rate
            )));
        }
        if b.minutes_per_maid <= 0 {
            return Err(InfraError::Config(
                "booking.minutes_per_maid must be positive".into(),
            ));
        }
        if b.duration_tolerance_minutes < 0 || b.studio_duration_minutes < 0 || b.studio_price < 0.0 {
            return Err(InfraError::Config(
                "booking durations and prices cannot be negative".into(),
            ));
        }
        if self.database.pool.min_connections > self.database.pool.max_connections {
            return Err(InfraError::Config(
                "database.pool.min_connections exceeds max_connections".into(),
            ));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(InfraError::Config("security.jwt_secret is empty".into()));
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.pool.max_connections,
            min_connections: self.database.pool.min_connections,
            connect_timeout_secs: self.database.pool.connect_timeout_secs,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            issuer: self.security.jwt_issuer.clone(),
        }
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        let b = &self.booking;
        PricingPolicy {
            sales_tax_rate: ratio_from_f64(b.sales_tax_rate, PricingPolicy::default().sales_tax_rate),
            duration_tolerance_minutes: b.duration_tolerance_minutes,
            studio_price: ratio_from_f64(b.studio_price, Decimal::new(20, 0)),
            studio_duration_minutes: b.studio_duration_minutes,
            minutes_per_maid: b.minutes_per_maid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9090

            [booking]
            sales_tax_rate = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.booking.minutes_per_maid, 360);
        assert_eq!(config.pricing_policy().sales_tax_rate, Decimal::new(1, 1));
        config.validate().unwrap();
    }

    #[test]
    fn default_policy_matches_pricing_constants() {
        let policy = AppConfig::default().pricing_policy();
        let expected = PricingPolicy::default();
        assert_eq!(policy.sales_tax_rate, expected.sales_tax_rate);
        assert_eq!(policy.studio_price, expected.studio_price);
        assert_eq!(policy.studio_duration_minutes, expected.studio_duration_minutes);
        assert_eq!(policy.minutes_per_maid, expected.minutes_per_maid);
        assert_eq!(policy.duration_tolerance_minutes, expected.duration_tolerance_minutes);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/cleaning-booking.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_tax_rate_is_rejected() {
        let mut config = AppConfig::default();
        config.booking.sales_tax_rate = 1.5;
        assert!(config.validate().is_err());
    }
}
