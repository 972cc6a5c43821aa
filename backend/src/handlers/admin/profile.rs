use axum::{
    extract::{Extension, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::admin::{AdminIdentity, ProfileResponse, UpdateProfilePayload},
    repositories::admin as admin_repo,
    state::AppState,
};

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<ProfileResponse>, AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let profile = admin_repo::update_profile(&state.pool, &admin.id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    tracing::info!(admin = %admin.id, "Profile updated");
    Ok(Json(ProfileResponse { profile }))
}
