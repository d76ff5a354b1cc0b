//! Signed token issuance and validation (HS256).
//!
//! Two token classes share one signing key: short-lived `access` tokens
//! authenticate ordinary API calls, long-lived `refresh` tokens are only
//! good for minting a new pair. Tokens are self-contained; expiry is the
//! only way a token stops being valid.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

/// Declared purpose of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: account ID.
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    /// Token class.
    #[serde(rename = "type")]
    pub class: TokenClass,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Not before (unix seconds).
    pub nbf: i64,
    /// Expires at (unix seconds, exclusive).
    pub exp: i64,
}

/// Freshly issued access + refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Token validation and issuance errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("expected a {expected} token, got a {actual} token")]
    WrongTokenClass {
        expected: TokenClass,
        actual: TokenClass,
    },

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Issues and validates tokens with a fixed key and fixed lifetimes.
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        // Time-based checks run in `validate` so a zero lifetime is already
        // expired and no leeway applies.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue an access + refresh pair for an account.
    pub fn issue_pair(
        &self,
        account_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<TokenPair, TokenError> {
        let access_token = self.issue(TokenClass::Access, account_id, email, role)?;
        let refresh_token = self.issue(TokenClass::Refresh, account_id, email, role)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Issue a single token of the given class.
    pub fn issue(
        &self,
        class: TokenClass,
        account_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<String, TokenError> {
        let ttl = match class {
            TokenClass::Access => self.access_ttl,
            TokenClass::Refresh => self.refresh_ttl,
        };
        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::Encoding(format!("{class} token lifetime overflows the clock"))
        })?;
        let claims = Claims {
            sub: account_id,
            email: email.to_string(),
            role,
            class,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature, structure and validity window. Any class passes.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                _ => TokenError::Malformed,
            })?;

        let now = Utc::now().timestamp();
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.nbf > now {
            return Err(TokenError::NotYetValid);
        }
        Ok(claims)
    }

    /// `validate`, then require the `access` class.
    pub fn validate_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_class(token, TokenClass::Access)
    }

    /// `validate`, then require the `refresh` class.
    pub fn validate_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_class(token, TokenClass::Refresh)
    }

    /// `validate`, then require `expected` class.
    pub fn validate_class(&self, token: &str, expected: TokenClass) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;
        if claims.class != expected {
            return Err(TokenError::WrongTokenClass {
                expected,
                actual: claims.class,
            });
        }
        Ok(claims)
    }
}
