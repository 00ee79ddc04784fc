//! Server configuration read from the environment.
//!
//! `.env` is loaded by `main` before [`ApiConfig::from_env`] runs, so every
//! variable here can come from either source.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use jhonote_core::{Error, Result};
use jhonote_db::PoolConfig;
use tracing::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/jhonote";
pub const DEFAULT_OWNER_HEADER: &str = "x-owner-id";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Which [`jhonote_core::NoteStore`] the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!("unknown STORE_BACKEND '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub backend: StoreBackend,
    /// Trusted header carrying the caller's identity
    pub owner_header: HeaderName,
    pub allowed_origins: Vec<HeaderValue>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// Seconds a request waits for a pooled connection
    pub db_acquire_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            backend: StoreBackend::Postgres,
            owner_header: HeaderName::from_static(DEFAULT_OWNER_HEADER),
            allowed_origins: parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_min_connections: DEFAULT_DB_MIN_CONNECTIONS,
            db_acquire_timeout_secs: DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let owner_header = match lookup("OWNER_HEADER") {
            Some(raw) => HeaderName::from_str(raw.trim())
                .map_err(|e| Error::Config(format!("invalid OWNER_HEADER '{}': {}", raw, e)))?,
            None => defaults.owner_header,
        };

        let backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.backend,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or_default("PORT", lookup("PORT"), DEFAULT_PORT),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            backend,
            owner_header,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|raw| parse_allowed_origins(&raw))
                .unwrap_or(defaults.allowed_origins),
            db_max_connections: parse_or_default(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                DEFAULT_DB_MAX_CONNECTIONS,
            ),
            db_min_connections: parse_or_default(
                "DB_MIN_CONNECTIONS",
                lookup("DB_MIN_CONNECTIONS"),
                DEFAULT_DB_MIN_CONNECTIONS,
            ),
            db_acquire_timeout_secs: parse_or_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                lookup("DB_ACQUIRE_TIMEOUT_SECS"),
                DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
            ),
        })
    }

    /// Pool settings for the Postgres backend.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections.min(self.db_max_connections))
            .connect_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Invalid numeric setting, using default");
            default
        }),
    }
}

/// Comma-separated origin list; invalid entries are dropped with a warning.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}
