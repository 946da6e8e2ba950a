//! JWT access token issuance and verification.
//!
//! Tokens are stateless: validity depends only on the signature, the pinned
//! algorithm and the `exp` claim at verification time.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::config::TokenConfig;
use crate::models::auth::{Principal, TokenClaims};

/// Token codec errors.
///
/// Callers deny access on every variant. The distinction exists for logs.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

/// Anything that can turn a raw bearer token into verified claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// Issues and verifies signed access tokens for one immutable configuration.
#[derive(Clone)]
pub struct TokenCodec {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.signature_key());
        let decoding_key = DecodingKey::from_secret(config.signature_key());

        // Only the configured algorithm is accepted. Expiry is checked by
        // `verify_at` with an exclusive bound and no leeway.
        let mut validation = Validation::new(config.algorithm());
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "iss"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Lifetime of issued tokens in whole seconds.
    pub fn expires_in(&self) -> i64 {
        self.config.access_token_lifetime().num_seconds()
    }

    /// Issue a token for `principal`, valid from now for the configured lifetime.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = TokenClaims {
            iss: self.config.application_name().to_string(),
            iat,
            exp: iat + self.expires_in(),
            user_id: principal.id.clone(),
            username: principal.username.clone(),
        };
        encode(
            &Header::new(self.config.algorithm()),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| TokenError::Encoding(format!("jwt encode: {e}")))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// A token is expired once `now >= exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

impl TokenVerifier for TokenCodec {
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        TokenCodec::verify(self, token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use jsonwebtoken::Algorithm;

    use super::*;

    const LIFETIME_SECS: i64 = 30 * 60;

    fn codec_with(secret: &str, algorithm: Algorithm) -> TokenCodec {
        let config = TokenConfig::new(
            "warung-test",
            secret,
            algorithm,
            Duration::seconds(LIFETIME_SECS),
        )
        .unwrap();
        TokenCodec::new(config)
    }

    fn codec() -> TokenCodec {
        codec_with("test-secret", Algorithm::HS256)
    }

    fn principal() -> Principal {
        Principal {
            id: "user-1".into(),
            username: "budi".into(),
        }
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn issued_token_verifies_with_same_principal() {
        let codec = codec();
        let token = codec.issue(&principal()).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.username, "budi");
        assert_eq!(claims.principal(), principal());
    }

    #[test]
    fn token_has_three_dot_separated_parts() {
        let token = codec().issue(&principal()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn claims_carry_issuer_and_lifetime() {
        let codec = codec();
        let t = issued_at();
        let token = codec.issue_at(&principal(), t).unwrap();
        let claims = codec.verify_at(&token, t).unwrap();
        assert_eq!(claims.iss, "warung-test");
        assert_eq!(claims.iat, t.timestamp());
        assert_eq!(claims.exp, t.timestamp() + LIFETIME_SECS);
    }

    #[test]
    fn token_valid_until_one_second_before_expiry() {
        let codec = codec();
        let t = issued_at();
        let token = codec.issue_at(&principal(), t).unwrap();

        let last_valid = t + Duration::seconds(LIFETIME_SECS - 1);
        assert!(codec.verify_at(&token, last_valid).is_ok());

        let at_expiry = t + Duration::seconds(LIFETIME_SECS);
        assert!(matches!(
            codec.verify_at(&token, at_expiry),
            Err(TokenError::Expired)
        ));

        let later = t + Duration::hours(5);
        assert!(matches!(
            codec.verify_at(&token, later),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn token_signed_with_other_algorithm_is_rejected() {
        let hs512 = codec_with("test-secret", Algorithm::HS512);
        let token = hs512.issue(&principal()).unwrap();
        assert!(matches!(
            codec().verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let other = codec_with("another-secret", Algorithm::HS256);
        let token = other.issue(&principal()).unwrap();
        assert!(matches!(
            codec().verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn swapped_signature_is_rejected() {
        let codec = codec();
        let mine = codec.issue(&principal()).unwrap();
        let theirs = codec
            .issue(&Principal {
                id: "user-2".into(),
                username: "sari".into(),
            })
            .unwrap();

        let (mine_body, _) = mine.rsplit_once('.').unwrap();
        let (_, their_sig) = theirs.rsplit_once('.').unwrap();
        let forged = format!("{mine_body}.{their_sig}");

        assert!(matches!(
            codec.verify(&forged),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            codec().verify("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(codec().verify(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn trait_object_verifies() {
        let codec = codec();
        let token = codec.issue(&principal()).unwrap();
        let verifier: &dyn TokenVerifier = &codec;
        assert_eq!(verifier.verify(&token).unwrap().username, "budi");
    }
}
