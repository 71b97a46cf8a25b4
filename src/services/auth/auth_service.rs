use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::repos::error::RepoError;
use crate::repos::user_repo::UserDirectory;
use crate::services::auth::token_service::{IssuedToken, TokenError, TokenService};

#[derive(Debug, Error)]
pub enum SignInError {
    /// Unknown user and wrong password are deliberately the same variant.
    #[error("invalid credentials")]
    Unauthenticated,
    #[error("user directory failure: {0}")]
    Directory(#[from] RepoError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Exchanges username/password for a signed access token.
#[derive(Clone)]
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    tokens: Arc<TokenService>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl AuthService {
    pub fn new(directory: Arc<dyn UserDirectory>, tokens: Arc<TokenService>) -> Self {
        Self { directory, tokens }
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<IssuedToken, SignInError> {
        let record = self
            .directory
            .find_by_username(username)
            .await
            .map_err(|e| {
                error!(error = %e, "user directory lookup failed");
                SignInError::Directory(e)
            })?;

        let Some(record) = record else {
            debug!(username, "sign-in rejected: unknown user");
            return Err(SignInError::Unauthenticated);
        };

        // Exact, case-sensitive comparison.
        if record.secret != password {
            debug!(username, "sign-in rejected: password mismatch");
            return Err(SignInError::Unauthenticated);
        }

        let issued = self.tokens.issue(&record.username, record.roles)?;
        debug!(username, expires_at = issued.expires_at, "access token issued");

        Ok(issued)
    }
}
