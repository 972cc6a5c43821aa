use sqlx::PgPool;

use crate::models::comment::{AdminComment, Comment};

const PUBLIC_COLUMNS: &str = "id, post_id, author_name, content, is_admin, created_at";

/// Comments of one post, oldest first.
pub async fn list_for_post(pool: &PgPool, post_id: i64) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE post_id = $1 ORDER BY created_at ASC, id ASC",
        PUBLIC_COLUMNS
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await
}

/// Every comment with its post, newest first.
pub async fn list_all_with_posts(pool: &PgPool) -> Result<Vec<AdminComment>, sqlx::Error> {
    sqlx::query_as::<_, AdminComment>(
        "SELECT c.id, c.post_id, c.author_name, c.content, c.device_id, c.is_admin, c.created_at, \
         p.title AS post_title, p.slug AS post_slug \
         FROM comments c JOIN posts p ON p.id = c.post_id \
         ORDER BY c.created_at DESC, c.id DESC",
    )
    .fetch_all(pool)
    .await
}

pub struct NewComment<'a> {
    pub post_id: i64,
    pub author_name: &'a str,
    pub content: &'a str,
    pub device_id: &'a str,
    pub is_admin: bool,
}

/// Inserts a comment and refreshes the post's cached comment count in one transaction.
pub async fn insert(pool: &PgPool, comment: NewComment<'_>) -> Result<Comment, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let created = sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (post_id, author_name, content, device_id, is_admin) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        PUBLIC_COLUMNS
    ))
    .bind(comment.post_id)
    .bind(comment.author_name)
    .bind(comment.content)
    .bind(comment.device_id)
    .bind(comment.is_admin)
    .fetch_one(&mut *tx)
    .await?;
    refresh_count(&mut tx, comment.post_id).await?;
    tx.commit().await?;
    Ok(created)
}

/// Deletes one comment of the post, or all of them when `comment_id` is `None`.
/// Returns the number of deleted rows.
pub async fn delete_for_post(
    pool: &PgPool,
    post_id: i64,
    comment_id: Option<i64>,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        "DELETE FROM comments WHERE post_id = $1 AND ($2::BIGINT IS NULL OR id = $2)",
    )
    .bind(post_id)
    .bind(comment_id)
    .execute(&mut *tx)
    .await?;
    refresh_count(&mut tx, post_id).await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

/// Deletes a comment by id regardless of post. Returns whether it existed.
pub async fn delete_by_id(pool: &PgPool, comment_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let post_id = sqlx::query_scalar::<_, i64>(
        "DELETE FROM comments WHERE id = $1 RETURNING post_id",
    )
    .bind(comment_id)
    .fetch_optional(&mut *tx)
    .await?;
    if let Some(post_id) = post_id {
        refresh_count(&mut tx, post_id).await?;
    }
    tx.commit().await?;
    Ok(post_id.is_some())
}

async fn refresh_count(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    post_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE posts SET comments_count = \
         (SELECT COUNT(*) FROM comments WHERE post_id = $1) WHERE id = $1",
    )
    .bind(post_id)
    .execute(&mut **tx)
    .await
    .map(|_| ())
}
