use crate::validation::rules::is_slug_char;

const EXCERPT_LENGTH: usize = 150;

/// Derives a URL slug from a title: lowercased, every disallowed character
/// becomes `-`, dash runs collapse and edge dashes are trimmed.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if is_slug_char(c) {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Plain-text preview of markdown content for list views.
pub fn make_excerpt(content: &str) -> String {
    let mut excerpt: String = content
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`'))
        .map(|c| if c == '\n' { ' ' } else { c })
        .take(EXCERPT_LENGTH)
        .collect();
    excerpt.push_str("...");
    excerpt
}
