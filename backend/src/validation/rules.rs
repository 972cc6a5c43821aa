//! Common validation rules shared across request payloads and path/query parameters.

use validator::ValidationError;

pub const MAX_SLUG_LENGTH: usize = 255;
pub const MAX_DEVICE_ID_LENGTH: usize = 100;
pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_PAGE: i64 = 1000;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Characters allowed in a slug: lowercase ASCII letters, digits, Hangul syllables.
/// The dash is handled separately since it is also the separator.
pub fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || is_hangul_syllable(c)
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.chars().count() <= MAX_SLUG_LENGTH
        && slug.chars().all(|c| c == '-' || is_slug_char(c))
}

/// Validates slug format.
///
/// Requirements:
/// - lowercase ASCII letters, digits, Hangul syllables and `-`
/// - 1-255 characters in length
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug_invalid"))
    }
}

pub fn is_valid_device_id(device_id: &str) -> bool {
    !device_id.is_empty()
        && device_id.len() <= MAX_DEVICE_ID_LENGTH
        && device_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validates an anonymous device identifier (`[A-Za-z0-9_-]`, at most 100 characters).
pub fn validate_device_id(device_id: &str) -> Result<(), ValidationError> {
    if is_valid_device_id(device_id) {
        Ok(())
    } else {
        Err(ValidationError::new("device_id_invalid"))
    }
}

/// Accepts an empty string (field cleared) or something shaped like `local@domain.tld`.
pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }
    let shaped = email.len() <= 255
        && !email.chars().any(char::is_whitespace)
        && email
            .split_once('@')
            .map(|(local, domain)| {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .split_once('.')
                        .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                        .unwrap_or(false)
            })
            .unwrap_or(false);
    if shaped {
        Ok(())
    } else {
        Err(ValidationError::new("email_invalid"))
    }
}

/// Removes anything between `<` and the next `>`; an unclosed `<` is kept verbatim.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Parses a page number; anything unparsable or below 1 becomes 1, capped at 1000.
pub fn clamp_page(raw: Option<&str>) -> i64 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(page) if page >= 1 => page.min(MAX_PAGE),
        _ => 1,
    }
}

/// Parses a page size; anything unparsable or below 1 becomes 10, capped at 100.
pub fn clamp_limit(raw: Option<&str>) -> i64 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(limit) if limit >= 1 => limit.min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

/// Trims a search term and cuts it to 100 characters. Blank input yields `None`.
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_SEARCH_LENGTH).collect())
}
