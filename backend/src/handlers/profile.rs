use axum::{extract::State, Json};

use crate::{
    error::AppError, models::admin::ProfileResponse, repositories::admin as admin_repo,
    state::AppState,
};

/// Public profile of the blog owner.
pub async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, AppError> {
    let profile = admin_repo::find_owner_profile(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(ProfileResponse { profile }))
}
