use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::ensure_valid_slug,
    middleware::MaybeAdmin,
    models::{
        admin::AdminIdentity,
        post::{Post, PostDraft, PostFilter, PostListQuery, PostListResponse, UpdatePostPayload},
        MessageResponse, Pagination,
    },
    repositories::{category as category_repo, post as post_repo},
    state::AppState,
    utils::slug::make_excerpt,
};

pub async fn list_posts(
    State(state): State<AppState>,
    admin: MaybeAdmin,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let page = query.page_query();
    let filter = PostFilter {
        category: query.category().map(str::to_string),
        search: query.search(),
        include_private: query.wants_private() && admin.is_admin(),
        author_id: None,
        sort: query.sort(),
    };

    let total = post_repo::count_posts(&state.pool, &filter).await?;
    let posts = post_repo::list_posts(&state.pool, &filter, page.limit(), page.offset()).await?;

    Ok(Json(PostListResponse {
        posts,
        pagination: Pagination::new(page.page(), page.limit(), total),
    }))
}

/// Private posts are reported as missing to everyone but the admin.
pub async fn get_post(
    State(state): State<AppState>,
    admin: MaybeAdmin,
    Path(slug): Path<String>,
) -> Result<Json<Post>, AppError> {
    ensure_valid_slug(&slug)?;
    let post = post_repo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|post| post.is_public || admin.is_admin())
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    Ok(Json(post))
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdatePostPayload>,
) -> Result<Json<Post>, AppError> {
    ensure_valid_slug(&slug)?;
    let payload = payload.normalized();
    payload.validate()?;

    if !category_repo::exists(&state.pool, payload.category_id).await? {
        return Err(AppError::BadRequest("Unknown category".to_string()));
    }

    let new_slug = payload.slug.clone().unwrap_or_else(|| slug.clone());
    if new_slug != slug && post_repo::slug_exists(&state.pool, &new_slug).await? {
        return Err(AppError::Conflict("Slug is already in use".to_string()));
    }

    let draft = PostDraft {
        excerpt: make_excerpt(&payload.content),
        title: payload.title,
        content: payload.content,
        category_id: payload.category_id,
        slug: new_slug,
        is_public: payload.is_public,
        github_commit_url: payload.github_commit_url,
    };

    let post = post_repo::update_post(&state.pool, &slug, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    tracing::info!(admin = %admin.id, post_id = post.id, slug = %post.slug, "Post updated");
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(slug): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_valid_slug(&slug)?;
    if !post_repo::delete_by_slug(&state.pool, &slug).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }
    tracing::info!(admin = %admin.id, slug = %slug, "Post deleted");
    Ok(Json(MessageResponse::new("Post deleted")))
}
