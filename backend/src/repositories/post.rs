//! Post queries.
//!
//! Every read joins `categories` so callers get the category name and slug
//! without a second round trip.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::post::{Post, PostDraft, PostFilter, PostSort};

const SELECT_POST: &str = "SELECT p.id, p.title, p.content, p.excerpt, p.category_id, \
     c.name AS category_name, c.slug AS category_slug, p.slug, p.github_commit_url, \
     p.is_public, p.author_id, p.likes_count, p.comments_count, p.created_at, p.updated_at \
     FROM posts p LEFT JOIN categories c ON c.id = p.category_id";

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a PostFilter) {
    builder.push(" WHERE TRUE");
    if !filter.include_private {
        builder.push(" AND p.is_public = TRUE");
    }
    if let Some(author_id) = &filter.author_id {
        builder.push(" AND p.author_id = ").push_bind(author_id);
    }
    if let Some(category) = &filter.category {
        builder.push(" AND c.name = ").push_bind(category);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (p.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.content ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Lists posts matching the filter, one page at a time.
pub async fn list_posts(
    pool: &PgPool,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(SELECT_POST);
    push_filters(&mut builder, filter);
    match filter.sort {
        PostSort::Likes => builder.push(" ORDER BY p.likes_count DESC, p.created_at DESC"),
        PostSort::Newest => builder.push(" ORDER BY p.created_at DESC, p.id DESC"),
    };
    builder
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    builder.build_query_as::<Post>().fetch_all(pool).await
}

/// Counts posts matching the filter, ignoring pagination.
pub async fn count_posts(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*) FROM posts p LEFT JOIN categories c ON c.id = p.category_id",
    );
    push_filters(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!("{} WHERE p.slug = $1", SELECT_POST))
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_id_by_slug(pool: &PgPool, slug: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
        .bind(slug)
        .fetch_one(pool)
        .await
}

/// Inserts a post and returns it with its category joined.
pub async fn insert_post(
    pool: &PgPool,
    draft: &PostDraft,
    author_id: &str,
) -> Result<Post, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO posts (title, content, excerpt, category_id, slug, is_public, \
         github_commit_url, author_id) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.excerpt)
    .bind(draft.category_id)
    .bind(&draft.slug)
    .bind(draft.is_public)
    .bind(&draft.github_commit_url)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Rewrites a post identified by its current slug. A missing commit URL keeps
/// the stored one. Returns `None` when no post has that slug.
pub async fn update_post(
    pool: &PgPool,
    current_slug: &str,
    draft: &PostDraft,
) -> Result<Option<Post>, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        "UPDATE posts SET title = $2, content = $3, excerpt = $4, category_id = $5, slug = $6, \
         is_public = $7, github_commit_url = COALESCE($8, github_commit_url), updated_at = NOW() WHERE slug = $1 RETURNING id",
    )
    .bind(current_slug)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(&draft.excerpt)
    .bind(draft.category_id)
    .bind(&draft.slug)
    .bind(draft.is_public)
    .bind(&draft.github_commit_url)
    .fetch_optional(pool)
    .await?;

    match id {
        Some(id) => find_by_id(pool, id).await,
        None => Ok(None),
    }
}

/// Deletes a post by slug; comments and likes cascade. Returns whether a row was removed.
pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE slug = $1")
        .bind(slug)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!("{} WHERE p.id = $1", SELECT_POST))
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns_are_escaped() {
        assert_eq!(escape_like("100%_sure\\"), "100\\%\\_sure\\\\");
        assert_eq!(escape_like("rust"), "rust");
    }

    #[test]
    fn public_listing_filters_private_posts() {
        let filter = PostFilter {
            category: Some("Rust".into()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_POST);
        push_filters(&mut builder, &filter);
        let sql = builder.sql();
        assert!(sql.contains("p.is_public = TRUE"));
        assert!(sql.contains("c.name = $1"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn admin_listing_with_search_binds_three_patterns() {
        let filter = PostFilter {
            search: Some("axum".into()),
            include_private: true,
            author_id: Some("admin".into()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_POST);
        push_filters(&mut builder, &filter);
        let sql = builder.sql();
        assert!(!sql.contains("p.is_public = TRUE"));
        assert!(sql.contains("p.author_id = $1"));
        assert!(sql.contains("p.title ILIKE $2"));
        assert!(sql.contains("c.name ILIKE $4"));
    }
}
