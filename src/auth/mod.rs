//! Bearer token verification and issuance.
//!
//! Tokens are the usual three-segment `header.payload.signature` form, each
//! segment base64url encoded without padding and the signature an HMAC-SHA256
//! over `header.payload`. Verification is done by hand so that only the
//! signature is authoritative; the header is never consulted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Identity claims carried in the token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: Uuid, email: impl Into<String>, role: impl Into<String>, ttl: Duration) -> Self {
        Self {
            sub,
            email: email.into(),
            role: role.into(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token format")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("failed to parse token claims")]
    MalformedClaims,

    #[error("token has expired")]
    Expired,

    #[error("token secret is not configured")]
    MissingSecret,

    #[error("token generation failed: {0}")]
    Generation(String),
}

/// Validates HMAC-SHA256 signed bearer tokens against a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: Vec<u8>,
    enforce_expiry: bool,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("enforce_expiry", &self.enforce_expiry)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            secret: secret.to_vec(),
            enforce_expiry: false,
        })
    }

    /// Reject tokens whose `exp` lies in the past. Off unless enabled.
    pub fn with_expiry_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_expiry = enforce;
        self
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(TokenError::Malformed);
        }

        let signing_input_len = parts[0].len() + 1 + parts[1].len();
        let signing_input = &token[..signing_input_len];

        let signature = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| TokenError::InvalidSignature)?;

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        // verify_slice compares in constant time
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| TokenError::MalformedClaims)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::MalformedClaims)?;

        if self.enforce_expiry && claims.exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Mint an HS256 token carrying `claims`.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let key = EncodingKey::from_secret(&self.secret);
        encode(&Header::default(), claims, &key).map_err(|e| TokenError::Generation(e.to_string()))
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::MissingSecret)
    }
}
