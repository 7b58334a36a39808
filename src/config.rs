use std::env;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use dotenvy::dotenv;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Memory,
    Mysql,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub storage_backend: StorageBackend,
    /// Required for the MySQL backend only.
    pub database_url: Option<String>,
    pub api_prefix: String,
    pub log_dir: String,

    // Rate limiting
    pub rate_api_per_min: u32,
    pub rate_import_per_min: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage_backend = var("STORAGE_BACKEND", "memory");
        let storage_backend = StorageBackend::from_str(&storage_backend)
            .map_err(|_| anyhow!("STORAGE_BACKEND must be 'memory' or 'mysql', got '{storage_backend}'"))?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage_backend == StorageBackend::Mysql && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set when STORAGE_BACKEND=mysql"));
        }

        Ok(Self {
            server_addr: var("SERVER_ADDR", "127.0.0.1:8080"),
            storage_backend,
            database_url,
            api_prefix: var("API_PREFIX", "/api"),
            log_dir: var("LOG_DIR", "logs"),

            rate_api_per_min: parse_number(&lookup, "RATE_API_PER_MIN", 1000)?,
            rate_import_per_min: parse_number(&lookup, "RATE_IMPORT_PER_MIN", 30)?,
        })
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u32,
) -> anyhow::Result<u32> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_in_memory_store() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.rate_import_per_min, 30);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn mysql_backend_requires_database_url() {
        let err = config_from(&[("STORAGE_BACKEND", "mysql")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = config_from(&[
            ("STORAGE_BACKEND", "MySQL"),
            ("DATABASE_URL", "mysql://hr:hr@localhost/hr"),
        ])
        .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Mysql);
    }

    #[test]
    fn rejects_bad_numbers_and_backends() {
        assert!(config_from(&[("RATE_API_PER_MIN", "lots")]).is_err());
        assert!(config_from(&[("STORAGE_BACKEND", "sqlite")]).is_err());
    }
}
