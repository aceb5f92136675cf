pub mod credentials;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub authorized: bool,
    pub userid: i64,
    pub email: String,
    pub exp: i64,
}

impl Claims {
    pub fn new(userid: i64, email: impl Into<String>, expiry_hours: u64) -> Result<Self, TokenError> {
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                TokenError::Encoding(format!("expiry of {} hours is out of range", expiry_hours))
            })?;

        Ok(Self {
            authorized: true,
            userid,
            email: email.into(),
            exp: exp.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token generation failed: {0}")]
    Encoding(String),

    #[error("token is expired")]
    Expired,

    #[error("token is invalid: {0}")]
    Invalid(String),
}

/// Issues and verifies HMAC-signed bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[hidden]")
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], expiry_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.as_bytes(), security.jwt_expiry_hours)
    }

    pub fn issue(&self, userid: i64, email: &str) -> Result<String, TokenError> {
        let claims = Claims::new(userid, email, self.expiry_hours)?;
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        // Any HMAC variant is accepted; RSA/EC headers fail with InvalidAlgorithm
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
