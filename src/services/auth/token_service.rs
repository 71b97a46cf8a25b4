use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::auth::identity::Identity;

/// Why a bearer token could not be turned into an [`Identity`].
///
/// The variants are only for diagnostics; callers of the guard chain never
/// see them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token could not be parsed")]
    Malformed,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in every access token (HS256 JWT payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// A freshly signed token plus the data the login response needs.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl IssuedToken {
    pub fn expires_in(&self) -> u64 {
        (self.expires_at - self.issued_at).max(0) as u64
    }
}

/// Signs and verifies shared-secret bearer tokens.
///
/// Holds only the key material and the TTL, both fixed at startup, so a
/// single instance is shared by every request without locking.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` so that `now >= exp` is already
        // expired and the clock can be supplied by the caller.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    pub fn issue<I, S>(&self, subject: &str, roles: I) -> Result<IssuedToken, TokenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue_at(subject, roles, now_seconds())
    }

    /// Issue a token as if the current time were `now` (unix seconds).
    pub fn issue_at<I, S>(&self, subject: &str, roles: I, now: i64) -> Result<IssuedToken, TokenError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                tracing::error!(ttl_seconds = self.ttl_seconds, "access token expiry overflows");
                TokenError::Signing("token lifetime out of range".to_string())
            })?;

        let claims = AccessTokenClaims {
            sub: subject.to_string(),
            roles: roles.into_iter().map(Into::into).collect(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign access token");
            TokenError::Signing(e.to_string())
        })?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at: exp,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, now_seconds())
    }

    /// Verify signature and expiry as of `now` (unix seconds).
    ///
    /// The signature is checked before expiry, so a forged token is reported
    /// as `InvalidSignature` even when its `exp` is in the past.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let claims = self.decode(token)?;

        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(Identity::new(claims.sub, claims.roles))
    }

    fn decode(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

fn now_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}
