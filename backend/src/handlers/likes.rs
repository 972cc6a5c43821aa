use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::ensure_valid_slug,
    models::like::{LikeQuery, LikeStatus, ToggleLikePayload},
    repositories::{like as like_repo, post as post_repo},
    state::AppState,
    validation::rules::is_valid_device_id,
};

fn ensure_valid_device_id(device_id: &str) -> Result<(), AppError> {
    if is_valid_device_id(device_id) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid deviceId".to_string()))
    }
}

async fn public_post_id(state: &AppState, slug: &str) -> Result<i64, AppError> {
    post_repo::find_by_slug(&state.pool, slug)
        .await?
        .filter(|post| post.is_public)
        .map(|post| post.id)
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

/// Like count of a post and, when `deviceId` is given, whether that device liked it.
pub async fn like_status(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LikeQuery>,
) -> Result<Json<LikeStatus>, AppError> {
    ensure_valid_slug(&slug)?;
    let device_id = query.device_id.unwrap_or_default();
    if !device_id.is_empty() {
        ensure_valid_device_id(&device_id)?;
    }

    let post_id = public_post_id(&state, &slug).await?;
    let status = like_repo::status(&state.pool, post_id, &device_id).await?;
    Ok(Json(status))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<ToggleLikePayload>,
) -> Result<Json<LikeStatus>, AppError> {
    ensure_valid_slug(&slug)?;
    ensure_valid_device_id(&payload.device_id)?;

    let post_id = public_post_id(&state, &slug).await?;
    let status = like_repo::toggle(&state.pool, post_id, &payload.device_id).await?;
    Ok(Json(status))
}
