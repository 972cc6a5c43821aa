use sqlx::PgPool;

use crate::models::category::{Category, CategoryWithCount};

const SELECT_COLUMNS: &str = "id, name, slug, created_at";

/// Lists categories alphabetically with their public post counts.
pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryWithCount>(
        "SELECT c.id, c.name, c.slug, c.created_at, \
         COUNT(p.id) FILTER (WHERE p.is_public) AS post_count \
         FROM categories c LEFT JOIN posts p ON p.category_id = c.id \
         GROUP BY c.id ORDER BY c.name ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!(
        "SELECT {} FROM categories WHERE slug = $1",
        SELECT_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Whether `name` or `slug` is already taken, optionally ignoring one category.
pub async fn name_or_slug_taken(
    pool: &PgPool,
    name: &str,
    slug: &str,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE (name = $1 OR slug = $2) \
         AND ($3::BIGINT IS NULL OR id <> $3))",
    )
    .bind(name)
    .bind(slug)
    .bind(except_id)
    .fetch_one(pool)
    .await
}

pub async fn insert(pool: &PgPool, name: &str, slug: &str) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING {}",
        SELECT_COLUMNS
    ))
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await
}

pub async fn rename(pool: &PgPool, id: i64, name: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET name = $2 WHERE id = $1 RETURNING {}",
        SELECT_COLUMNS
    ))
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Number of posts (public or private) filed under the category.
pub async fn post_count(pool: &PgPool, id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE category_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
