//! API server configuration.

use std::time::Duration;

use warung_core::config::{
    Algorithm, ConfigError, DEFAULT_ACCESS_TOKEN_LIFETIME_MINUTES, DEFAULT_APPLICATION_NAME,
    TokenConfig, parse_algorithm, parse_lifetime_minutes, resolve_signature_key,
};
use warung_core::orders::service::DEFAULT_STORAGE_TIMEOUT;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Access token settings.
    pub token: TokenConfig,
    /// Upper bound on one place-order call.
    pub storage_timeout: Duration,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                        | Default                             |
    /// |---------------------------------|-------------------------------------|
    /// | `BIND_ADDR`                     | `127.0.0.1:8000`                    |
    /// | `DATABASE_URL`                  | `postgres://localhost:5432/warung`  |
    /// | `APP_NAME`                      | `warung-makan`                      |
    /// | `JWT_SIGNATURE_KEY`             | generated & persisted to file       |
    /// | `JWT_SIGNING_METHOD`            | `HS256`                             |
    /// | `ACCESS_TOKEN_LIFETIME_MINUTES` | `30`                                |
    /// | `STORAGE_TIMEOUT_SECS`          | `10`                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok(), resolve_signature_key())
    }

    /// Builds the configuration from a variable lookup and an already resolved key.
    pub fn from_vars<F>(var: F, signature_key: String) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let algorithm = match var("JWT_SIGNING_METHOD") {
            Some(name) => parse_algorithm(&name)?,
            None => Algorithm::HS256,
        };
        let lifetime = match var("ACCESS_TOKEN_LIFETIME_MINUTES") {
            Some(value) => parse_lifetime_minutes(&value)?,
            None => chrono::Duration::minutes(DEFAULT_ACCESS_TOKEN_LIFETIME_MINUTES),
        };
        let storage_timeout = match var("STORAGE_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    name: "STORAGE_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_STORAGE_TIMEOUT,
        };

        let token = TokenConfig::new(
            var("APP_NAME").unwrap_or_else(|| DEFAULT_APPLICATION_NAME.into()),
            signature_key,
            algorithm,
            lifetime,
        )?;

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8000".into()),
            pg_connection_url: var("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/warung".into()),
            token,
            storage_timeout,
        })
    }
}
