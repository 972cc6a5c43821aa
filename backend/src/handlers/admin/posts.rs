use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        admin::AdminIdentity,
        post::{CreatePostPayload, Post, PostDraft, PostFilter, PostListResponse},
        PageQuery, Pagination,
    },
    repositories::{category as category_repo, post as post_repo},
    state::AppState,
    utils::slug::{generate_slug, make_excerpt},
    validation::rules::is_valid_slug,
};

/// All posts written by the caller, private ones included.
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let filter = PostFilter {
        include_private: true,
        author_id: Some(admin.id),
        ..Default::default()
    };

    let total = post_repo::count_posts(&state.pool, &filter).await?;
    let posts = post_repo::list_posts(&state.pool, &filter, page.limit(), page.offset()).await?;

    Ok(Json(PostListResponse {
        posts,
        pagination: Pagination::new(page.page(), page.limit(), total),
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(payload): Json<CreatePostPayload>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let slug = generate_slug(&payload.title);
    if !is_valid_slug(&slug) {
        return Err(AppError::BadRequest(
            "Title must contain at least one letter or digit".to_string(),
        ));
    }
    if !category_repo::exists(&state.pool, payload.category_id).await? {
        return Err(AppError::BadRequest("Unknown category".to_string()));
    }
    if post_repo::slug_exists(&state.pool, &slug).await? {
        return Err(AppError::Conflict(
            "A post with the same slug already exists".to_string(),
        ));
    }

    let draft = PostDraft {
        excerpt: make_excerpt(&payload.content),
        title: payload.title,
        content: payload.content,
        category_id: payload.category_id,
        slug,
        is_public: payload.is_public,
        github_commit_url: payload.github_commit_url,
    };
    let post = post_repo::insert_post(&state.pool, &draft, &admin.id).await?;

    tracing::info!(admin = %admin.id, post_id = post.id, slug = %post.slug, "Post created");
    Ok((StatusCode::CREATED, Json(post)))
}
