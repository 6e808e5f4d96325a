//! # Configuration
//!
//! Runtime settings for the POS API, read from the environment.
//!
//! | Variable                   | Default                               |
//! |----------------------------|---------------------------------------|
//! | `CAIXA_DB_PATH`            | `<platform data dir>/caixa.db`        |
//! | `CAIXA_BIND_ADDR`          | `127.0.0.1:4000`                      |
//! | `CAIXA_STORE_NAME`         | unset (no store line on receipts)     |
//! | `CAIXA_STORAGE_KEY`        | `caixa-pos-storage`                   |
//! | `CAIXA_UTC_OFFSET_MINUTES` | `-180` (America/Sao_Paulo)            |

use std::net::SocketAddr;
use std::path::PathBuf;

use caixa_core::{ReceiptOptions, DEFAULT_STORAGE_KEY, DEFAULT_UTC_OFFSET_MINUTES};
use directories::ProjectDirs;
use serde::Serialize;

/// Default listen address. Loopback only: the POS frontend runs on the
/// same machine.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4000";

/// POS API configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConfig {
    /// SQLite file holding the snapshot.
    pub database_path: PathBuf,

    pub bind_addr: SocketAddr,

    /// Printed on receipts when set.
    pub store_name: Option<String>,

    /// Key the PosState snapshot is stored under.
    pub storage_key: String,

    /// Offset used to render receipt timestamps.
    pub utc_offset_minutes: i32,
}

impl PosConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a
    /// variable or `None` when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_path = match var("CAIXA_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let bind_addr = var("CAIXA_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CAIXA_BIND_ADDR".to_string()))?;

        let utc_offset_minutes = match var("CAIXA_UTC_OFFSET_MINUTES") {
            Some(raw) => parse_offset(&raw)?,
            None => DEFAULT_UTC_OFFSET_MINUTES,
        };

        Ok(PosConfig {
            database_path,
            bind_addr,
            store_name: var("CAIXA_STORE_NAME").map(|s| s.trim().to_string()),
            storage_key: var("CAIXA_STORAGE_KEY")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            utc_offset_minutes,
        })
    }

    /// Configuration for tests: in-memory database, default key.
    pub fn for_tests() -> Self {
        PosConfig {
            database_path: PathBuf::from(":memory:"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            store_name: Some("Loja Teste".to_string()),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }

    pub fn receipt_options(&self) -> ReceiptOptions {
        ReceiptOptions {
            store_name: self.store_name.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }
}

/// Offsets outside ±18h are rejected, matching what a fixed UTC offset can hold.
fn parse_offset(raw: &str) -> Result<i32, ConfigError> {
    let invalid = || ConfigError::InvalidValue("CAIXA_UTC_OFFSET_MINUTES".to_string());
    let minutes: i32 = raw.trim().parse().map_err(|_| invalid())?;
    if minutes.abs() >= 18 * 60 {
        return Err(invalid());
    }
    Ok(minutes)
}

/// Platform data directory:
/// - **Linux**: `~/.local/share/caixa-pos/caixa.db`
/// - **macOS**: `~/Library/Application Support/br.caixa.pos/caixa.db`
/// - **Windows**: `%APPDATA%\caixa\pos\data\caixa.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("br", "caixa", "pos").ok_or(ConfigError::NoDataDir)?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(data_dir.join("caixa.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine app data directory; set CAIXA_DB_PATH")]
    NoDataDir,

    #[error("Could not create app data directory: {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PosConfig::from_lookup(lookup(&[("CAIXA_DB_PATH", "/tmp/caixa.db")])).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/caixa.db"));
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.utc_offset_minutes, -180);
        assert!(config.store_name.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = PosConfig::from_lookup(lookup(&[
            ("CAIXA_DB_PATH", "/tmp/caixa.db"),
            ("CAIXA_BIND_ADDR", "0.0.0.0:8080"),
            ("CAIXA_STORE_NAME", " Mercadinho "),
            ("CAIXA_STORAGE_KEY", "loja-2"),
            ("CAIXA_UTC_OFFSET_MINUTES", "-240"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.store_name.as_deref(), Some("Mercadinho"));
        assert_eq!(config.storage_key, "loja-2");
        assert_eq!(config.receipt_options().utc_offset_minutes, -240);
    }

    #[test]
    fn test_invalid_values() {
        let bad_addr = PosConfig::from_lookup(lookup(&[
            ("CAIXA_DB_PATH", "/tmp/caixa.db"),
            ("CAIXA_BIND_ADDR", "not-an-address"),
        ]));
        assert!(matches!(bad_addr, Err(ConfigError::InvalidValue(v)) if v == "CAIXA_BIND_ADDR"));

        let bad_offset = PosConfig::from_lookup(lookup(&[
            ("CAIXA_DB_PATH", "/tmp/caixa.db"),
            ("CAIXA_UTC_OFFSET_MINUTES", "9999"),
        ]));
        assert!(bad_offset.is_err());
    }
}
