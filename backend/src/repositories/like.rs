use sqlx::PgPool;

use crate::models::like::LikeStatus;

/// Like state of one device plus the post's total.
pub async fn status(pool: &PgPool, post_id: i64, device_id: &str) -> Result<LikeStatus, sqlx::Error> {
    let (liked, count) = sqlx::query_as::<_, (bool, i64)>(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND device_id = $2), \
         (SELECT COUNT(*) FROM likes WHERE post_id = $1)",
    )
    .bind(post_id)
    .bind(device_id)
    .fetch_one(pool)
    .await?;
    Ok(LikeStatus { liked, count })
}

/// Adds the device's like if absent, removes it otherwise, and refreshes the
/// post's cached count. Runs in one transaction holding the post row lock,
/// so toggles on the same post are serialized.
pub async fn toggle(pool: &PgPool, post_id: i64, device_id: &str) -> Result<LikeStatus, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    let removed = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND device_id = $2")
        .bind(post_id)
        .bind(device_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        > 0;

    if !removed {
        sqlx::query(
            "INSERT INTO likes (post_id, device_id) VALUES ($1, $2) \
             ON CONFLICT (post_id, device_id) DO NOTHING",
        )
        .bind(post_id)
        .bind(device_id)
        .execute(&mut *tx)
        .await?;
    }

    let count = sqlx::query_scalar::<_, i64>(
        "UPDATE posts SET likes_count = (SELECT COUNT(*) FROM likes WHERE post_id = $1) \
         WHERE id = $1 RETURNING likes_count",
    )
    .bind(post_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(LikeStatus {
        liked: !removed,
        count,
    })
}
