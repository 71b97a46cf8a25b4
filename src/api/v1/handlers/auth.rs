/*
 * Responsibility
 * - POST /auth/login: 資格情報 → access token (Public)
 * - GET /auth/profile: guard chain が付けた Identity をそのまま返す
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::auth::{LoginRequest, LoginResponse, ProfileResponse},
        extractors::CurrentIdentity,
    },
    error::AppError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let issued = state.auth.sign_in(&req.username, &req.password).await?;

    Ok(Json(LoginResponse {
        expires_in: issued.expires_in(),
        token: issued.token,
        token_type: "Bearer".to_string(),
    }))
}

pub async fn profile(CurrentIdentity(identity): CurrentIdentity) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(identity))
}
