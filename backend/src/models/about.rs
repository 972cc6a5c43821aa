use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AboutPage {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tech_stack: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl AboutPage {
    /// Served until the owner writes the page. `id` 0 marks it as unsaved.
    pub fn placeholder() -> Self {
        Self {
            id: 0,
            title: "About".to_string(),
            content: "# About\n\nWrite something about yourself.".to_string(),
            tech_stack: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAboutPayload {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(max = 100000))]
    pub content: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

impl UpdateAboutPayload {
    /// Drops blank and duplicate tech stack entries, preserving order.
    pub fn normalized_tech_stack(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for item in &self.tech_stack {
            let item = item.trim();
            if !item.is_empty() && !seen.iter().any(|s: &String| s == item) {
                seen.push(item.to_string());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_marked_unsaved() {
        let page = AboutPage::placeholder();
        assert_eq!(page.id, 0);
        assert!(page.tech_stack.is_empty());
    }

    #[test]
    fn tech_stack_is_cleaned() {
        let payload = UpdateAboutPayload {
            title: "About".into(),
            content: String::new(),
            tech_stack: vec![" Rust ".into(), "".into(), "Rust".into(), "Axum".into()],
        };
        assert_eq!(payload.normalized_tech_stack(), vec!["Rust", "Axum"]);
    }
}
