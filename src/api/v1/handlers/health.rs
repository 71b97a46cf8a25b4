/*
 * Responsibility
 * - GET /health (疎通用)
 * - controller 単位で Public (handler 側は注釈なし → controller の既定値に fallback)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
