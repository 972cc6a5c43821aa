use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::ensure_valid_slug,
    middleware::MaybeAdmin,
    models::{
        admin::AdminIdentity,
        comment::{
            CommentCreatedResponse, CommentListResponse, CreateCommentPayload, DeleteCommentQuery,
        },
    },
    repositories::{
        comment::{self as comment_repo, NewComment},
        post as post_repo,
    },
    state::AppState,
};

/// Unknown posts yield an empty list rather than 404.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CommentListResponse>, AppError> {
    ensure_valid_slug(&slug)?;
    let comments = match post_repo::find_id_by_slug(&state.pool, &slug).await? {
        Some(post_id) => comment_repo::list_for_post(&state.pool, post_id).await?,
        None => Vec::new(),
    };
    Ok(Json(CommentListResponse { comments }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    admin: MaybeAdmin,
    Path(slug): Path<String>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<(StatusCode, Json<CommentCreatedResponse>), AppError> {
    ensure_valid_slug(&slug)?;
    let payload = payload.sanitized();
    payload.validate()?;

    let post = post_repo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|post| post.is_public || admin.is_admin())
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let comment = comment_repo::insert(
        &state.pool,
        NewComment {
            post_id: post.id,
            author_name: &payload.author_name,
            content: &payload.content,
            device_id: &payload.device_id,
            is_admin: admin.is_admin(),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentCreatedResponse {
            message: "Comment created".to_string(),
            comment,
        }),
    ))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteCommentsResponse {
    pub message: String,
    pub deleted: u64,
}

/// Deletes one comment of a post (`commentId`) or every comment of the post.
pub async fn delete_comments(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(slug): Path<String>,
    Query(query): Query<DeleteCommentQuery>,
) -> Result<Json<DeleteCommentsResponse>, AppError> {
    ensure_valid_slug(&slug)?;
    let post_id = post_repo::find_id_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let deleted = comment_repo::delete_for_post(&state.pool, post_id, query.comment_id).await?;
    if query.comment_id.is_some() && deleted == 0 {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    tracing::info!(admin = %admin.id, post_id, deleted, "Comments deleted");
    Ok(Json(DeleteCommentsResponse {
        message: "Comments deleted".to_string(),
        deleted,
    }))
}
