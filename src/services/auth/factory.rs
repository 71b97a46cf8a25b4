/// Factory: build auth services from application `Config`.
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::repos::error::RepoError;
use crate::repos::user_repo::{InMemoryUserDirectory, PgUserDirectory, UserDirectory};
use crate::services::auth::TokenService;

pub fn build_token_service(config: &Config) -> Arc<TokenService> {
    Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.access_token_ttl_seconds,
    ))
}

/// Postgres-backed directory when `DATABASE_URL` is set, otherwise the seeded
/// in-memory accounts.
pub async fn build_user_directory(config: &Config) -> Result<Arc<dyn UserDirectory>, RepoError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let db = PgPoolOptions::new().max_connections(5).connect(url).await?;
            tracing::info!("using postgres user directory");
            Ok(Arc::new(PgUserDirectory::new(db)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using seeded in-memory user directory");
            Ok(Arc::new(InMemoryUserDirectory::seeded()))
        }
    }
}
