/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: sign-in, guards: guard chain, routes: route annotations, cats, id_codec
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動後に書き換わるのは cats の中身だけ (secret / TTL / annotations は不変)
 */
use std::sync::Arc;

use crate::repos::cat_repo::CatRepo;
use crate::services::auth::{AuthService, GuardChain, RouteMetadataReader};
use crate::services::id_codec::IdCodec;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub guards: Arc<GuardChain>,
    pub routes: Arc<RouteMetadataReader>,
    pub cats: Arc<CatRepo>,
    pub id_codec: IdCodec,
}

impl AppState {
    pub fn new(
        auth: Arc<AuthService>,
        guards: Arc<GuardChain>,
        routes: Arc<RouteMetadataReader>,
        cats: Arc<CatRepo>,
        id_codec: IdCodec,
    ) -> Self {
        Self {
            auth,
            guards,
            routes,
            cats,
            id_codec,
        }
    }
}
