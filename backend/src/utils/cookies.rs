use std::time::Duration;

use axum::http::HeaderMap;

use crate::config::{Config, CookieSecurity};

pub const TOKEN_COOKIE_NAME: &str = "token";
pub const TOKEN_COOKIE_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    /// Unknown values fall back to `Lax`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieOptions {
    /// Resolves cookie attributes for one request.
    ///
    /// With `COOKIE_SECURE` unset the cookie is `Secure` when the proxy reports
    /// `X-Forwarded-Proto: https`, or in production when no proxy header is present.
    /// Browsers reject `SameSite=None` without `Secure`, so that combination always sets it.
    pub fn for_request(headers: &HeaderMap, config: &Config) -> Self {
        let forwarded_proto = headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_ascii_lowercase());

        let secure = match config.cookie_secure {
            CookieSecurity::Always => true,
            CookieSecurity::Never => false,
            CookieSecurity::Auto => match forwarded_proto.as_deref() {
                Some(proto) => proto == "https",
                None => config.production_mode,
            },
        };

        Self {
            secure: secure || config.cookie_same_site == SameSite::None,
            same_site: config.cookie_same_site,
        }
    }
}

pub fn build_auth_cookie(value: &str, max_age: Duration, options: CookieOptions) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite={}",
        TOKEN_COOKIE_NAME,
        value,
        TOKEN_COOKIE_PATH,
        max_age.as_secs(),
        options.same_site.as_str()
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn build_clear_cookie(options: CookieOptions) -> String {
    build_auth_cookie("", Duration::ZERO, options)
}

/// First non-empty value of cookie `name` in a `Cookie` header.
pub fn extract_cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        let value = value.trim();
        (key.trim() == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// Reads the auth token from every `Cookie` header on the request. Empty values count as absent.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| extract_cookie_value(value, TOKEN_COOKIE_NAME))
}
