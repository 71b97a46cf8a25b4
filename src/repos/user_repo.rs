/*
 * Responsibility
 * - username → 資格情報 (password / roles) の lookup
 * - login (sign-in) の時だけ参照される。発行済み token の検証では使わない
 * - Postgres (SQLx) 版と、開発用のシード済み in-memory 版を提供
 */
use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CredentialRecord {
    pub username: String,
    #[sqlx(rename = "password")]
    pub secret: String,
    pub roles: Vec<String>,
}

impl CredentialRecord {
    pub fn new<I, S>(username: &str, secret: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.to_string(),
            secret: secret.to_string(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str)
    -> Result<Option<CredentialRecord>, RepoError>;
}

/// Fixed set of accounts kept in memory (development / tests).
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, CredentialRecord>,
}

impl InMemoryUserDirectory {
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CredentialRecord>,
    {
        Self {
            users: records
                .into_iter()
                .map(|r| (r.username.clone(), r))
                .collect(),
        }
    }

    /// The two demo accounts: `john` (admin) and `maria` (no roles).
    pub fn seeded() -> Self {
        Self::new([
            CredentialRecord::new("john", "changeme", ["admin"]),
            CredentialRecord::new("maria", "guess", Vec::<String>::new()),
        ])
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, RepoError> {
        Ok(self.users.get(username).cloned())
    }
}

/// `users` table: username TEXT UNIQUE, password TEXT, roles TEXT[].
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, RepoError> {
        let row = sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT username, password, roles
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}
