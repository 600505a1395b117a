use crate::error::{MarketError, Result};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_FILTER: &str = "info,puppymarket=debug";

/// Key/value configuration snapshotted from the process environment
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
    dotenv_error: Option<String>,
}

impl ConfigService {
    /// Load `.env` (if present) and snapshot the environment
    ///
    /// An unreadable `.env` is skipped and kept in [`Self::dotenv_error`]
    /// so it can be logged once tracing is up.
    pub fn new() -> Self {
        let dotenv_error = dotenvy::dotenv()
            .err()
            .filter(|e| !e.not_found())
            .map(|e| e.to_string());
        Self {
            dotenv_error,
            ..Self::from_pairs(env::vars())
        }
    }

    pub fn dotenv_error(&self) -> Option<&str> {
        self.dotenv_error.as_deref()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let service = Self::default();
        for (key, value) in pairs {
            service.config.insert(key.into(), value.into());
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Parse a value, falling back to `default` when the key is absent
    pub fn get_parsed_or<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| {
                MarketError::Internal(format!("configuration key {key} has invalid value '{raw}'"))
            }),
        }
    }
}

/// Typed application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub database_url: Option<String>,
    pub security: SecurityConfig,
}

/// Settings consumed by registration and the authority guard
#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    /// Lower-cased emails granted `ADMIN` on registration
    pub admin_emails: Vec<String>,
}

impl SecurityConfig {
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|admin| *admin == email)
    }
}

impl AppConfig {
    pub fn from_service(config: &ConfigService) -> Result<Self> {
        let admin_emails = config
            .get("PUPPYMARKET_ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(|email| email.trim().to_lowercase())
                    .filter(|email| !email.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: config.get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: config.get_parsed_or("PORT", DEFAULT_PORT)?,
            log_filter: config
                .get("RUST_LOG")
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            database_url: config.get("DATABASE_URL").filter(|url| !url.is_empty()),
            security: SecurityConfig { admin_emails },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            database_url: None,
            security: SecurityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_keys_are_missing() {
        let config = AppConfig::from_service(&ConfigService::from_pairs(Vec::<(String, String)>::new()))
            .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.database_url.is_none());
        assert!(config.security.admin_emails.is_empty());
    }

    #[test]
    fn reads_port_and_admin_emails() {
        let service = ConfigService::from_pairs([
            ("PORT", "8081"),
            ("PUPPYMARKET_ADMIN_EMAILS", " Admin@Puppy.Market, ,ops@puppy.market"),
        ]);
        let config = AppConfig::from_service(&service).unwrap();
        assert_eq!(config.port, 8081);
        assert!(config.security.is_admin_email("admin@puppy.market"));
        assert!(config.security.is_admin_email("OPS@puppy.market"));
        assert!(!config.security.is_admin_email("someone@puppy.market"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let service = ConfigService::from_pairs([("PORT", "eighty")]);
        assert!(AppConfig::from_service(&service).is_err());
    }

    #[test]
    fn explicit_pairs_carry_no_dotenv_error() {
        let service = ConfigService::from_pairs([("HOST", "127.0.0.1")]);
        assert!(service.dotenv_error().is_none());
        assert_eq!(service.get("HOST").as_deref(), Some("127.0.0.1"));
    }
}
