//! Guard chain middleware: route annotations → authentication → authorization
//! → Identity を extensions に入れて handler へ
//!
//! - route 登録時に `guarded()` で HandlerRef を紐づける (per-route layer)
//! - 失敗理由 (missing / expired / forged / malformed) はログにのみ出し、
//!   caller には一律 401 を返す
//! - `guarded()` を通さずに登録した route は guard chain の外に出るので注意

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::{Credentials, GuardInput, HandlerRef};
use crate::state::AppState;

#[derive(Clone)]
struct RouteGuard {
    state: AppState,
    handler: HandlerRef,
}

/// Put `route` behind the guard chain, evaluated with the annotations of
/// `handler`.
///
/// 例：
/// ```ignore
/// .route("/cats", guarded(&state, CATS_CREATE, post(create_cat)))
/// ```
pub fn guarded(
    state: &AppState,
    handler: HandlerRef,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let guard = RouteGuard {
        state: state.clone(),
        handler,
    };
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    route.route_layer(middleware::from_fn_with_state(guard, guard_middleware))
}

async fn guard_middleware(
    State(guard): State<RouteGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let metadata = guard.state.routes.resolve(guard.handler);

    let span = tracing::debug_span!(
        "guard",
        controller = guard.handler.controller,
        method = guard.handler.method
    );
    let ctx = span.in_scope(|| {
        guard.state.guards.evaluate(&GuardInput {
            metadata: &metadata,
            credentials: Credentials::from_header(req.headers().get(header::AUTHORIZATION)),
        })
    })?;

    // guard chain → extractor への受け渡し (public route では何も入らない)
    if let Some(identity) = ctx.into_identity() {
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}
