use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::{
    error::AppError,
    models::{admin::AdminIdentity, comment::AdminCommentListResponse, MessageResponse},
    repositories::comment as comment_repo,
    state::AppState,
};

/// Every comment on the blog, newest first, with the post it belongs to.
pub async fn list_comments(
    State(state): State<AppState>,
) -> Result<Json<AdminCommentListResponse>, AppError> {
    let comments = comment_repo::list_all_with_posts(&state.pool).await?;
    Ok(Json(AdminCommentListResponse { comments }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !comment_repo::delete_by_id(&state.pool, id).await? {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }
    tracing::info!(admin = %admin.id, comment_id = id, "Comment deleted");
    Ok(Json(MessageResponse::new("Comment deleted")))
}
