//! Token configuration.
//!
//! Built once at startup and handed by value to [`crate::auth::jwt::TokenCodec`].
//! Every check here is fatal at startup; nothing is re-read per request.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Duration;
pub use jsonwebtoken::Algorithm;
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use thiserror::Error;
use tracing::{info, warn};

/// Issuer used when no application name is configured.
pub const DEFAULT_APPLICATION_NAME: &str = "warung-makan";

/// Access token lifetime: 30 minutes.
pub const DEFAULT_ACCESS_TOKEN_LIFETIME_MINUTES: i64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Signature key must not be empty")]
    EmptySignatureKey,

    #[error("Unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Signing algorithm {0:?} is not an HMAC variant")]
    UnsupportedAlgorithm(Algorithm),

    #[error("Access token lifetime must be positive, got {0} seconds")]
    InvalidLifetime(i64),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Immutable configuration for issuing and verifying access tokens.
#[derive(Clone)]
pub struct TokenConfig {
    application_name: String,
    signature_key: String,
    algorithm: Algorithm,
    access_token_lifetime: Duration,
}

impl TokenConfig {
    /// Validate and build a token configuration.
    pub fn new(
        application_name: impl Into<String>,
        signature_key: impl Into<String>,
        algorithm: Algorithm,
        access_token_lifetime: Duration,
    ) -> Result<Self, ConfigError> {
        let signature_key = signature_key.into();
        if signature_key.is_empty() {
            return Err(ConfigError::EmptySignatureKey);
        }
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::UnsupportedAlgorithm(algorithm));
        }
        if access_token_lifetime <= Duration::zero() {
            return Err(ConfigError::InvalidLifetime(
                access_token_lifetime.num_seconds(),
            ));
        }
        Ok(Self {
            application_name: application_name.into(),
            signature_key,
            algorithm,
            access_token_lifetime,
        })
    }

    /// HS256, 30 minute lifetime, default issuer.
    pub fn with_defaults(signature_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(
            DEFAULT_APPLICATION_NAME,
            signature_key,
            Algorithm::HS256,
            Duration::minutes(DEFAULT_ACCESS_TOKEN_LIFETIME_MINUTES),
        )
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn signature_key(&self) -> &[u8] {
        self.signature_key.as_bytes()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn access_token_lifetime(&self) -> Duration {
        self.access_token_lifetime
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("application_name", &self.application_name)
            .field("signature_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_lifetime", &self.access_token_lifetime)
            .finish()
    }
}

/// Parse a signing algorithm name such as `"HS256"`.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    Algorithm::from_str(name.trim()).map_err(|_| ConfigError::UnknownAlgorithm(name.to_string()))
}

/// Parse a lifetime given in whole minutes.
pub fn parse_lifetime_minutes(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        name: "ACCESS_TOKEN_LIFETIME_MINUTES",
        value: value.to_string(),
    };
    let minutes: i64 = value.trim().parse().map_err(|_| invalid())?;
    Duration::try_minutes(minutes).ok_or_else(invalid)
}

/// Resolve the signature key: env var `JWT_SIGNATURE_KEY` → persisted file → generated.
pub fn resolve_signature_key() -> String {
    let from_env = std::env::var("JWT_SIGNATURE_KEY").ok();
    resolve_signature_key_at(from_env, &signature_key_path())
}

/// Key resolution against an explicit key file.
///
/// A generated key that cannot be persisted is still returned, so the
/// process can start, but tokens it signs will not survive a restart.
fn resolve_signature_key_at(from_env: Option<String>, key_path: &Path) -> String {
    if let Some(key) = from_env
        && !key.is_empty()
    {
        return key;
    }
    if let Ok(existing) = std::fs::read_to_string(key_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let key: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    match persist_signature_key(key_path, &key) {
        Ok(()) => info!(path = %key_path.display(), "generated new JWT signature key"),
        Err(e) => warn!(
            path = %key_path.display(),
            error = %e,
            "generated JWT signature key could not be persisted; tokens will not verify after restart"
        ),
    }
    key
}

fn persist_signature_key(key_path: &Path, key: &str) -> std::io::Result<()> {
    if let Some(parent) = key_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(key_path, key)
}

/// Path to the persisted signature key file.
fn signature_key_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("warung")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_hs256_thirty_minutes() {
        let config = TokenConfig::with_defaults("secret").unwrap();
        assert_eq!(config.algorithm(), Algorithm::HS256);
        assert_eq!(config.access_token_lifetime(), Duration::minutes(30));
        assert_eq!(config.application_name(), DEFAULT_APPLICATION_NAME);
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = TokenConfig::with_defaults("").unwrap_err();
        assert!(matches!(err, ConfigError::EmptySignatureKey));
    }

    #[test]
    fn non_hmac_algorithm_is_rejected() {
        let err = TokenConfig::new("app", "secret", Algorithm::RS256, Duration::minutes(5))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedAlgorithm(Algorithm::RS256)));
    }

    #[test]
    fn non_positive_lifetime_is_rejected() {
        let err =
            TokenConfig::new("app", "secret", Algorithm::HS256, Duration::zero()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLifetime(0)));
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(matches!(
            parse_algorithm("HS999"),
            Err(ConfigError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn lifetime_minutes_parse() {
        assert_eq!(parse_lifetime_minutes("45").unwrap(), Duration::minutes(45));
        assert!(parse_lifetime_minutes("soon").is_err());
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("warung-key-{}", crate::uuid::generate_id()))
    }

    #[test]
    fn env_key_wins() {
        let dir = scratch_dir();
        let key = resolve_signature_key_at(Some("from-env".into()), &dir.join("jwt-secret"));
        assert_eq!(key, "from-env");
        assert!(!dir.exists());
    }

    #[test]
    fn generated_key_is_persisted_and_reused() {
        let dir = scratch_dir();
        let path = dir.join("warung").join("jwt-secret");

        let first = resolve_signature_key_at(None, &path);
        let second = resolve_signature_key_at(Some(String::new()), &path);

        assert_eq!(first.len(), 64);
        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn unwritable_key_path_still_yields_a_key() {
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let path = blocker.join("jwt-secret");

        assert!(persist_signature_key(&path, "k").is_err());
        let key = resolve_signature_key_at(None, &path);
        assert_eq!(key.len(), 64);
        assert!(!path.exists());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn debug_output_hides_key() {
        let config = TokenConfig::with_defaults("super-secret").unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("super-secret"));
    }
}
