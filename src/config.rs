use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_expiry_days: i64,
    pub db_pool_size: u32,
    pub db_busy_timeout_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "hsk_srs.db".into(),
            bind_addr: "127.0.0.1:5000".into(),
            session_expiry_days: 1,
            db_pool_size: 8,
            db_busy_timeout_ms: 5000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_expiry_days: parse_or(
                &lookup,
                "SESSION_EXPIRY_DAYS",
                defaults.session_expiry_days,
            )?,
            db_pool_size: parse_or(&lookup, "DB_POOL_SIZE", defaults.db_pool_size)?,
            db_busy_timeout_ms: parse_or(&lookup, "DB_BUSY_TIMEOUT_MS", defaults.db_busy_timeout_ms)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
