use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::ensure_valid_slug,
    models::category::{CategoryResponse, CategoryWithCount},
    repositories::category as category_repo,
    state::AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithCount>>, AppError> {
    Ok(Json(category_repo::list_with_counts(&state.pool).await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    ensure_valid_slug(&slug)?;
    let category = category_repo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    Ok(Json(CategoryResponse { category }))
}
