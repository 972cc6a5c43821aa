#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::comments::DeleteCommentsResponse,
    models::{
        about::{AboutPage, UpdateAboutPayload},
        admin::{
            AdminIdentity, AdminProfile, AuthStatus, LoginPayload, LoginResponse, ProfileResponse,
            UpdateProfilePayload,
        },
        category::{
            Category, CategoryResponse, CategoryWithCount, CreateCategoryPayload,
            UpdateCategoryPayload,
        },
        comment::{
            AdminComment, AdminCommentListResponse, Comment, CommentCreatedResponse,
            CommentListResponse, CreateCommentPayload, DeleteCommentQuery,
        },
        like::{LikeQuery, LikeStatus, ToggleLikePayload},
        post::{CreatePostPayload, Post, PostListQuery, PostListResponse, UpdatePostPayload},
        stats::BlogStats,
        MessageResponse, PageQuery, Pagination,
    },
    utils::cookies::TOKEN_COOKIE_NAME,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        logout_doc,
        check_doc,
        list_posts_doc,
        get_post_doc,
        update_post_doc,
        delete_post_doc,
        like_status_doc,
        toggle_like_doc,
        list_comments_doc,
        create_comment_doc,
        delete_comments_doc,
        list_categories_doc,
        get_category_doc,
        stats_doc,
        profile_doc,
        about_doc,
        admin_list_posts_doc,
        admin_create_post_doc,
        admin_list_comments_doc,
        admin_delete_comment_doc,
        admin_create_category_doc,
        admin_rename_category_doc,
        admin_delete_category_doc,
        admin_update_profile_doc,
        admin_update_about_doc
    ),
    components(
        schemas(
            // auth
            LoginPayload,
            LoginResponse,
            AuthStatus,
            AdminIdentity,
            // posts
            Post,
            PostListResponse,
            Pagination,
            CreatePostPayload,
            UpdatePostPayload,
            // engagement
            LikeStatus,
            ToggleLikePayload,
            Comment,
            CommentListResponse,
            CommentCreatedResponse,
            CreateCommentPayload,
            DeleteCommentsResponse,
            AdminComment,
            AdminCommentListResponse,
            // categories
            Category,
            CategoryWithCount,
            CategoryResponse,
            CreateCategoryPayload,
            UpdateCategoryPayload,
            // owner
            AdminProfile,
            ProfileResponse,
            UpdateProfilePayload,
            AboutPage,
            UpdateAboutPayload,
            BlogStats,
            // shared
            MessageResponse,
            ErrorResponse
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Login, logout and session status"),
        (name = "Posts", description = "Posts, likes and comments"),
        (name = "Blog", description = "Categories, profile, about page and stats"),
        (name = "Admin", description = "Owner-only management API")
    )
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "TokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(TOKEN_COOKIE_NAME))),
        );
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in; sets the token cookie", body = LoginResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Auth"
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Clears the token cookie", body = MessageResponse)),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/check",
    responses(
        (status = 200, description = "Session status; never fails for bad tokens", body = AuthStatus),
        (status = 500, description = "Signing secret not configured", body = ErrorResponse)
    ),
    tag = "Auth",
    security((), ("TokenCookie" = []))
)]
fn check_doc() {}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(PostListQuery),
    responses((status = 200, body = PostListResponse)),
    tag = "Posts",
    security((), ("TokenCookie" = []))
)]
fn list_posts_doc() {}

#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, body = Post),
        (status = 400, description = "Invalid slug", body = ErrorResponse),
        (status = 404, description = "Unknown or private post", body = ErrorResponse)
    ),
    tag = "Posts",
    security((), ("TokenCookie" = []))
)]
fn get_post_doc() {}

#[utoipa::path(
    put,
    path = "/api/posts/{slug}",
    params(("slug" = String, Path, description = "Current post slug")),
    request_body = UpdatePostPayload,
    responses(
        (status = 200, body = Post),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, description = "New slug already in use", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn update_post_doc() {}

#[utoipa::path(
    delete,
    path = "/api/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses((status = 200, body = MessageResponse), (status = 404, body = ErrorResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn delete_post_doc() {}

#[utoipa::path(
    get,
    path = "/api/posts/{slug}/likes",
    params(("slug" = String, Path, description = "Post slug"), LikeQuery),
    responses(
        (status = 200, body = LikeStatus),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 429, body = ErrorResponse)
    ),
    tag = "Posts"
)]
fn like_status_doc() {}

#[utoipa::path(
    post,
    path = "/api/posts/{slug}/likes",
    params(("slug" = String, Path, description = "Post slug")),
    request_body = ToggleLikePayload,
    responses(
        (status = 200, description = "Like toggled", body = LikeStatus),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 429, body = ErrorResponse)
    ),
    tag = "Posts"
)]
fn toggle_like_doc() {}

#[utoipa::path(
    get,
    path = "/api/comments/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses((status = 200, body = CommentListResponse), (status = 429, body = ErrorResponse)),
    tag = "Posts"
)]
fn list_comments_doc() {}

#[utoipa::path(
    post,
    path = "/api/comments/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    request_body = CreateCommentPayload,
    responses(
        (status = 201, body = CommentCreatedResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 429, body = ErrorResponse)
    ),
    tag = "Posts",
    security((), ("TokenCookie" = []))
)]
fn create_comment_doc() {}

#[utoipa::path(
    delete,
    path = "/api/comments/{slug}",
    params(("slug" = String, Path, description = "Post slug"), DeleteCommentQuery),
    responses((status = 200, body = DeleteCommentsResponse), (status = 404, body = ErrorResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn delete_comments_doc() {}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, body = [CategoryWithCount])),
    tag = "Blog"
)]
fn list_categories_doc() {}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses((status = 200, body = CategoryResponse), (status = 404, body = ErrorResponse)),
    tag = "Blog"
)]
fn get_category_doc() {}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses((status = 200, body = BlogStats), (status = 429, body = ErrorResponse)),
    tag = "Blog"
)]
fn stats_doc() {}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses((status = 200, body = ProfileResponse), (status = 404, body = ErrorResponse)),
    tag = "Blog"
)]
fn profile_doc() {}

#[utoipa::path(
    get,
    path = "/api/about",
    responses((status = 200, description = "Stored page or a placeholder", body = AboutPage)),
    tag = "Blog"
)]
fn about_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/posts",
    params(PageQuery),
    responses((status = 200, body = PostListResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_list_posts_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/posts",
    request_body = CreatePostPayload,
    responses(
        (status = 201, body = Post),
        (status = 400, body = ErrorResponse),
        (status = 409, body = ErrorResponse),
        (status = 429, body = ErrorResponse)
    ),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_create_post_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/comments",
    responses((status = 200, body = AdminCommentListResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_list_comments_doc() {}

#[utoipa::path(
    delete,
    path = "/api/admin/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    responses((status = 200, body = MessageResponse), (status = 404, body = ErrorResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_delete_comment_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryPayload,
    responses((status = 201, body = CategoryResponse), (status = 409, body = ErrorResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_create_category_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = UpdateCategoryPayload,
    responses((status = 200, body = CategoryResponse), (status = 404, body = ErrorResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_rename_category_doc() {}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, description = "Category still has posts", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_delete_category_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/profile",
    request_body = UpdateProfilePayload,
    responses((status = 200, body = ProfileResponse), (status = 400, body = ErrorResponse)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_update_profile_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/about",
    request_body = UpdateAboutPayload,
    responses((status = 200, body = AboutPage)),
    tag = "Admin",
    security(("TokenCookie" = []))
)]
fn admin_update_about_doc() {}
