use axum::{
    extract::{Extension, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        about::{AboutPage, UpdateAboutPayload},
        admin::AdminIdentity,
    },
    repositories::about as about_repo,
    state::AppState,
};

pub async fn update_about(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(payload): Json<UpdateAboutPayload>,
) -> Result<Json<AboutPage>, AppError> {
    payload.validate()?;
    let tech_stack = payload.normalized_tech_stack();
    let page = about_repo::upsert(
        &state.pool,
        payload.title.trim(),
        &payload.content,
        &tech_stack,
    )
    .await?;
    tracing::info!(admin = %admin.id, "About page updated");
    Ok(Json(page))
}
