//! Admin API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! - `ADMIN_HTTP_PORT` - HTTP port (default: 8787)
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `JWT_SECRET` - HS256 secret shared with the identity provider
//! - `DEFAULT_DAYS_GIVEN` - subscription length when a request omits it (default: 30)
//! - `ADMIN_BACKEND` - `postgres` or `memory` (default: postgres)

use std::str::FromStr;

use caixa_core::validation::validate_days_given;
use serde::Serialize;

/// Which `TenantBackend` implementation to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres,
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(BackendKind::Postgres),
            "memory" => Ok(BackendKind::Memory),
            _ => Err(ConfigError::InvalidValue("ADMIN_BACKEND".to_string())),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AdminConfig {
    /// HTTP server port
    pub http_port: u16,

    /// PostgreSQL connection string
    #[serde(skip_serializing)]
    pub database_url: String,

    /// JWT secret for validating bearer tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Subscription length in days when `daysGiven` is omitted
    pub default_days_given: i64,

    pub backend: BackendKind,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_port = var("ADMIN_HTTP_PORT")
            .unwrap_or_else(|| "8787".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ADMIN_HTTP_PORT".to_string()))?;

        let default_days_given: i64 = var("DEFAULT_DAYS_GIVEN")
            .unwrap_or_else(|| "30".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_DAYS_GIVEN".to_string()))?;
        validate_days_given(default_days_given)
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_DAYS_GIVEN".to_string()))?;

        let backend = match var("ADMIN_BACKEND") {
            Some(raw) => raw.parse()?,
            None => BackendKind::Postgres,
        };

        let database_url = var("DATABASE_URL").unwrap_or_default();
        if backend == BackendKind::Postgres && database_url.is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_URL".to_string()));
        }

        let jwt_secret =
            var("JWT_SECRET").ok_or_else(|| ConfigError::MissingRequired("JWT_SECRET".to_string()))?;

        Ok(AdminConfig {
            http_port,
            database_url,
            jwt_secret,
            default_days_given,
            backend,
        })
    }

    /// In-memory backend with a fixed secret.
    pub fn for_tests() -> Self {
        AdminConfig {
            http_port: 0,
            database_url: String::new(),
            jwt_secret: "test-secret".to_string(),
            default_days_given: 30,
            backend: BackendKind::Memory,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AdminConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/caixa"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.http_port, 8787);
        assert_eq!(config.default_days_given, 30);
        assert_eq!(config.backend, BackendKind::Postgres);
    }

    #[test]
    fn test_memory_backend_needs_no_database_url() {
        let config = load(&[("ADMIN_BACKEND", "memory"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert!(config.database_url.is_empty());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("ADMIN_BACKEND", "memory"), ("JWT_SECRET", "x"), ("ADMIN_HTTP_PORT", "http")]),
            Err(ConfigError::InvalidValue(v)) if v == "ADMIN_HTTP_PORT"
        ));
        assert!(matches!(
            load(&[("ADMIN_BACKEND", "memory"), ("JWT_SECRET", "x"), ("DEFAULT_DAYS_GIVEN", "0")]),
            Err(ConfigError::InvalidValue(v)) if v == "DEFAULT_DAYS_GIVEN"
        ));
        assert!(matches!(
            load(&[("ADMIN_BACKEND", "redis"), ("JWT_SECRET", "x")]),
            Err(ConfigError::InvalidValue(v)) if v == "ADMIN_BACKEND"
        ));
    }

    #[test]
    fn test_missing_required() {
        assert!(matches!(
            load(&[("JWT_SECRET", "x")]),
            Err(ConfigError::MissingRequired(v)) if v == "DATABASE_URL"
        ));
        assert!(matches!(
            load(&[("ADMIN_BACKEND", "memory")]),
            Err(ConfigError::MissingRequired(v)) if v == "JWT_SECRET"
        ));
    }
}
