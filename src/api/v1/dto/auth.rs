/*
 * Responsibility
 * - /auth 系の request/response DTO
 * - login の body 検証は「空でない」程度 (資格情報の判定は AuthService)
 */
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::services::auth::Identity;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: u64,
}

/// Exactly what the guard chain attached; nothing is looked up again.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub subject: String,
    pub roles: BTreeSet<String>,
}

impl From<Identity> for ProfileResponse {
    fn from(identity: Identity) -> Self {
        Self {
            subject: identity.subject,
            roles: identity.roles,
        }
    }
}
