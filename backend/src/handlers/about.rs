use axum::{extract::State, Json};

use crate::{models::about::AboutPage, repositories::about as about_repo, state::AppState};

/// The about page never fails: a missing row or a storage error yields the placeholder.
pub async fn get_about(State(state): State<AppState>) -> Json<AboutPage> {
    match about_repo::find_latest(&state.pool).await {
        Ok(Some(page)) => Json(page),
        Ok(None) => Json(AboutPage::placeholder()),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load about page; serving placeholder");
            Json(AboutPage::placeholder())
        }
    }
}
