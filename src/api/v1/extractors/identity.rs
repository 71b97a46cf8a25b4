/*
 * Responsibility
 * - guard chain が extensions に入れた Identity を handler に渡す extractor
 * - Identity は AuthenticationGuard が付けたものをそのまま返す (再検証・再導出しない)
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Identity;
use crate::state::AppState;

/// The caller's identity on a secured route.
///
/// Absence means the handler was registered as public (or outside the guard
/// chain) while still asking for an identity: a wiring defect, so 500.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(identity) => Ok(CurrentIdentity(identity.clone())),
            None => {
                tracing::error!(
                    path = %parts.uri.path(),
                    "handler requires an identity but none was attached"
                );
                Err(AppError::Internal)
            }
        }
    }
}
