/*
 * Responsibility
 * - Path の公開 ID (sqids) を受け取り、内部 ID (u32) に復号する extractor
 * - リソースごとの型は types.rs のタグで区別する (PublicId<CatTag> など)
 * - 復号失敗は AppError 経由で 400 (INVALID_PUBLIC_ID)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

pub struct PublicId<T> {
    pub id: u32,
    _marker: PhantomData<T>,
}

impl<T> FromRequestParts<AppState> for PublicId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(public_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("INVALID_PUBLIC_ID", "invalid id"))?;

        let id = state.id_codec.decode(&public_id)?;

        Ok(Self {
            id,
            _marker: PhantomData,
        })
    }
}

impl<T> std::fmt::Debug for PublicId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicId").field("id", &self.id).finish()
    }
}
