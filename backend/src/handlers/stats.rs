use axum::{extract::State, Json};

use crate::{
    error::AppError, models::stats::BlogStats, repositories::stats as stats_repo, state::AppState,
};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<BlogStats>, AppError> {
    Ok(Json(stats_repo::blog_stats(&state.pool).await?))
}
