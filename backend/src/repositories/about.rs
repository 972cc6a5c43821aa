use sqlx::PgPool;

use crate::models::about::AboutPage;

const SELECT_COLUMNS: &str = "id, title, content, tech_stack, updated_at";

/// Latest saved about page, if any.
pub async fn find_latest(pool: &PgPool) -> Result<Option<AboutPage>, sqlx::Error> {
    sqlx::query_as::<_, AboutPage>(&format!(
        "SELECT {} FROM about_page ORDER BY id DESC LIMIT 1",
        SELECT_COLUMNS
    ))
    .fetch_optional(pool)
    .await
}

/// Overwrites the latest about page, creating the first one when none exists.
pub async fn upsert(
    pool: &PgPool,
    title: &str,
    content: &str,
    tech_stack: &[String],
) -> Result<AboutPage, sqlx::Error> {
    let updated = sqlx::query_as::<_, AboutPage>(&format!(
        "UPDATE about_page SET title = $1, content = $2, tech_stack = $3, updated_at = NOW() \
         WHERE id = (SELECT MAX(id) FROM about_page) RETURNING {}",
        SELECT_COLUMNS
    ))
    .bind(title)
    .bind(content)
    .bind(tech_stack)
    .fetch_optional(pool)
    .await?;

    if let Some(page) = updated {
        return Ok(page);
    }

    sqlx::query_as::<_, AboutPage>(&format!(
        "INSERT INTO about_page (title, content, tech_stack) VALUES ($1, $2, $3) RETURNING {}",
        SELECT_COLUMNS
    ))
    .bind(title)
    .bind(content)
    .bind(tech_stack)
    .fetch_one(pool)
    .await
}
