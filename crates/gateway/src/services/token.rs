//! Session token issuing and verification.
//!
//! Tokens are HS256 JWTs whose `sub` is the account ID. They are the opaque
//! `access_token` handed to clients in a [`Session`](stylish_core::Session).

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stylish_core::{UserId, UserProfile};

use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// Signature, expiry, or structure check failed.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// The token verified but its subject is not an account ID.
    #[error("malformed subject: {0}")]
    Subject(String),
}

/// Claims carried in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub provider: String,
    pub name: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Account ID encoded in `sub`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Subject` if `sub` is not numeric.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| TokenError::Subject(self.sub.clone()))
    }
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionTokens {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    lifetime_secs: u64,
}

impl SessionTokens {
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
            lifetime_secs: config.lifetime_secs,
        }
    }

    /// Token lifetime in seconds, reported to clients as `access_expired`.
    #[must_use]
    pub const fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Sign a token for `profile`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if encoding fails.
    pub fn issue(&self, profile: &UserProfile) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(self.lifetime_secs).unwrap_or(i64::MAX);
        let claims = SessionClaims {
            sub: profile.id.to_string(),
            provider: profile.provider.to_string(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            iat: now,
            exp: now.saturating_add(lifetime),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, an expired token, or
    /// anything that is not a JWT.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
