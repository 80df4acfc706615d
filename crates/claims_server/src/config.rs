//! Server settings read from the environment (after `.env`, if present).
//!
//!   CLAIMS_BIND_ADDR           listen address (default 0.0.0.0:5172)
//!   CLAIMS_STORE               postgres | file | memory
//!   CLAIMS_DATABASE_URL        Postgres connection string
//!   CLAIMS_DB_MAX_CONNECTIONS  pool size (default 10)
//!   CLAIMS_CONFIG_PATH         config document path for the file store
//!   CORS_ORIGIN                allowed origin (default any)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5172";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_CONFIG_PATH: &str = "claim_config.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("CLAIMS_DATABASE_URL must be set when CLAIMS_STORE=postgres")]
    MissingDatabaseUrl,
}

/// Where claims and the configuration document are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Both in Postgres.
    Postgres,
    /// Claims in memory, configuration document in a JSON file.
    File,
    /// Both in memory; lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            _ => Err("expected postgres, file or memory".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub config_path: PathBuf,
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let database_url = get("CLAIMS_DATABASE_URL");
        let store = match get("CLAIMS_STORE") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "CLAIMS_STORE",
                value: raw.clone(),
                reason,
            })?,
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let db_max_connections = match get("CLAIMS_DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "CLAIMS_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: "must be at least 1".into(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "CLAIMS_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            bind_addr: get("CLAIMS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            store,
            database_url,
            db_max_connections,
            config_path: get("CLAIMS_CONFIG_PATH")
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into())
                .into(),
            cors_origin: get("CORS_ORIGIN"),
        })
    }
}
