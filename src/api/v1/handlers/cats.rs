/*
 * Responsibility
 * - /cats 系 CRUD handler
 * - Path の {cat_id} は公開 ID → extractor で復号して内部 ID で受け取る
 * - 認可は guard chain 側で済んでいる (handler では Identity を見ない)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::cats::{CatResponse, CreateCatRequest, UpdateCatRequest},
        extractors::public_id::PublicCatId,
    },
    error::AppError,
    repos::cat_repo::CatRow,
    state::AppState,
};

fn row_to_response(state: &AppState, row: CatRow) -> Result<CatResponse, AppError> {
    Ok(CatResponse {
        id: state.id_codec.encode(row.cat_id)?,
        name: row.name,
        age: row.age,
        breed: row.breed,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCatRequest>,
) -> Result<(StatusCode, Json<CatResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let row = state
        .cats
        .create(req.name.trim(), req.age, req.breed.trim())
        .await
        .ok_or_else(|| {
            tracing::error!("cat id space exhausted");
            AppError::Internal
        })?;
    tracing::info!(cat_id = row.cat_id, "cat created");

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<CatResponse>>, AppError> {
    let rows = state.cats.list().await;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(&state, row)?);
    }

    Ok(Json(res))
}

pub async fn find_one(
    State(state): State<AppState>,
    cat_id: PublicCatId,
) -> Result<Json<CatResponse>, AppError> {
    let row = state
        .cats
        .get(cat_id.id)
        .await
        .ok_or(AppError::not_found("cat"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn update(
    State(state): State<AppState>,
    cat_id: PublicCatId,
    Json(req): Json<UpdateCatRequest>,
) -> Result<Json<CatResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let row = state
        .cats
        .update(
            cat_id.id,
            req.name.as_deref().map(str::trim),
            req.age,
            req.breed.as_deref().map(str::trim),
        )
        .await
        .ok_or(AppError::not_found("cat"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn remove(
    State(state): State<AppState>,
    cat_id: PublicCatId,
) -> Result<StatusCode, AppError> {
    if state.cats.delete(cat_id.id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("cat"))
    }
}
