use sqlx::PgPool;

use crate::models::stats::BlogStats;

/// Site-wide totals. Only public posts are counted.
pub async fn blog_stats(pool: &PgPool) -> Result<BlogStats, sqlx::Error> {
    sqlx::query_as::<_, BlogStats>(
        "SELECT \
         (SELECT COUNT(*) FROM posts WHERE is_public) AS total_posts, \
         (SELECT COUNT(*) FROM likes) AS total_likes, \
         (SELECT COUNT(*) FROM comments) AS total_comments",
    )
    .fetch_one(pool)
    .await
}
