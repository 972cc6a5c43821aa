use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        admin::AdminIdentity,
        category::{CategoryResponse, CreateCategoryPayload, UpdateCategoryPayload},
        MessageResponse,
    },
    repositories::category as category_repo,
    state::AppState,
    utils::slug::generate_slug,
    validation::rules::is_valid_slug,
};

pub async fn create_category(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    payload.validate()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_string()));
    }
    let slug = payload
        .slug
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| generate_slug(name));
    if !is_valid_slug(&slug) {
        return Err(AppError::BadRequest("Invalid slug".to_string()));
    }
    if category_repo::name_or_slug_taken(&state.pool, name, &slug, None).await? {
        return Err(AppError::Conflict("Category already exists".to_string()));
    }

    let category = category_repo::insert(&state.pool, name, &slug).await?;
    tracing::info!(admin = %admin.id, category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

/// Renames a category; its slug is left untouched so existing links keep working.
pub async fn rename_category(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<Json<CategoryResponse>, AppError> {
    payload.validate()?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_string()));
    }

    let category = category_repo::rename(&state.pool, id, name)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    tracing::info!(admin = %admin.id, category_id = id, "Category renamed");
    Ok(Json(CategoryResponse { category }))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let in_use = category_repo::post_count(&state.pool, id).await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "Category is used by {} post(s)",
            in_use
        )));
    }
    if !category_repo::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Category not found".to_string()));
    }
    tracing::info!(admin = %admin.id, category_id = id, "Category deleted");
    Ok(Json(MessageResponse::new("Category deleted")))
}
