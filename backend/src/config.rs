use anyhow::anyhow;
use std::{env, net::SocketAddr, time::Duration};

use crate::utils::cookies::SameSite;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/blog";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// How the `Secure` attribute of the auth cookie is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSecurity {
    /// Derived per request from `X-Forwarded-Proto` and the deployment mode.
    Auto,
    Always,
    Never,
}

impl CookieSecurity {
    fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("true") | Some("1") | Some("yes") => CookieSecurity::Always,
            Some("false") | Some("0") | Some("no") => CookieSecurity::Never,
            _ => CookieSecurity::Auto,
        }
    }
}

/// A fixed-window limit applied to one route bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub bucket: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn per_minute(bucket: &'static str, max_requests: u32) -> Self {
        Self {
            bucket,
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicies {
    pub login: RateLimitPolicy,
    pub comment_create: RateLimitPolicy,
    pub comment_read: RateLimitPolicy,
    pub stats_read: RateLimitPolicy,
    pub like_read: RateLimitPolicy,
    pub like_toggle: RateLimitPolicy,
    pub admin_post_create: RateLimitPolicy,
}

impl Default for RateLimitPolicies {
    fn default() -> Self {
        Self {
            login: RateLimitPolicy::per_minute("login", 5),
            comment_create: RateLimitPolicy::per_minute("comments-post", 10),
            comment_read: RateLimitPolicy::per_minute("comments-get", 60),
            stats_read: RateLimitPolicy::per_minute("stats", 60),
            like_read: RateLimitPolicy::per_minute("likes-get", 60),
            like_toggle: RateLimitPolicy::per_minute("likes-post", 20),
            admin_post_create: RateLimitPolicy::per_minute("admin-posts-post", 10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// `None` when `JWT_SECRET` is unset or blank; token operations then fail closed.
    pub jwt_secret: Option<String>,
    pub production_mode: bool,
    pub bind_addr: SocketAddr,
    pub cookie_secure: CookieSecurity,
    pub cookie_same_site: SameSite,
    pub cors_allow_origins: Vec<String>,
    pub rate_limits: RateLimitPolicies,
    pub rate_limit_sweep_interval: Duration,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let production_mode = lookup("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database_max_connections = parse_u32(
            lookup("DATABASE_MAX_CONNECTIONS"),
            if production_mode { 10 } else { 5 },
        );

        let jwt_secret = lookup("JWT_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let bind_raw = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|_| anyhow!("Invalid SERVER_ADDR value: {}", bind_raw))?;

        let cookie_secure = CookieSecurity::parse(lookup("COOKIE_SECURE").as_deref());
        let cookie_same_site = lookup("COOKIE_SAME_SITE")
            .map(|v| SameSite::parse(&v))
            .unwrap_or(SameSite::Lax);

        let cors_allow_origins = parse_origins(
            lookup("CORS_ALLOW_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        );

        let defaults = RateLimitPolicies::default();
        let rate_limits = RateLimitPolicies {
            login: policy_override(&lookup, "LOGIN", defaults.login),
            comment_create: policy_override(&lookup, "COMMENT_CREATE", defaults.comment_create),
            comment_read: policy_override(&lookup, "COMMENT_READ", defaults.comment_read),
            stats_read: policy_override(&lookup, "STATS_READ", defaults.stats_read),
            like_read: policy_override(&lookup, "LIKE_READ", defaults.like_read),
            like_toggle: policy_override(&lookup, "LIKE_TOGGLE", defaults.like_toggle),
            admin_post_create: policy_override(
                &lookup,
                "ADMIN_POST_CREATE",
                defaults.admin_post_create,
            ),
        };

        let rate_limit_sweep_interval = Duration::from_secs(parse_u64(
            lookup("RATE_LIMIT_SWEEP_INTERVAL_SECONDS"),
            DEFAULT_SWEEP_INTERVAL_SECONDS,
        ));

        Ok(Config {
            database_url,
            database_max_connections,
            jwt_secret,
            production_mode,
            bind_addr,
            cookie_secure,
            cookie_same_site,
            cors_allow_origins,
            rate_limits,
            rate_limit_sweep_interval,
        })
    }
}

fn policy_override<F>(lookup: &F, name: &str, default: RateLimitPolicy) -> RateLimitPolicy
where
    F: Fn(&str) -> Option<String>,
{
    let max_requests = parse_u32(
        lookup(&format!("RATE_LIMIT_{}_MAX_REQUESTS", name)),
        default.max_requests,
    );
    let window_seconds = parse_u64(
        lookup(&format!("RATE_LIMIT_{}_WINDOW_SECONDS", name)),
        default.window.as_secs(),
    );
    RateLimitPolicy {
        bucket: default.bucket,
        max_requests,
        window: Duration::from_secs(window_seconds),
    }
}

// Zero is raised to 1 so a typo can never disable a limit or spin the sweeper.
fn parse_u32(value: Option<String>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
        .max(1)
}

fn parse_u64(value: Option<String>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
        .max(1)
}

/// Database URL with any password replaced by `***`, for logging.
pub fn redact_database_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() && parsed.set_password(Some("***")).is_err() {
                return "<redacted>".into();
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable>".into(),
    }
}

fn parse_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).expect("config")
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.jwt_secret.is_none());
        assert!(!config.production_mode);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.cookie_secure, CookieSecurity::Auto);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert_eq!(config.cors_allow_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.rate_limits, RateLimitPolicies::default());
        assert_eq!(config.rate_limit_sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn database_password_is_redacted_for_logs() {
        assert_eq!(
            redact_database_url("postgres://blog:hunter2@db:5432/blog"),
            "postgres://blog:***@db:5432/blog"
        );
        assert_eq!(
            redact_database_url("postgres://localhost/blog"),
            "postgres://localhost/blog"
        );
        assert_eq!(redact_database_url("not a url"), "<unparseable>");
    }

    #[test]
    fn blank_secret_is_treated_as_missing() {
        let config = config_from(&[("JWT_SECRET", "   ")]);
        assert!(config.jwt_secret.is_none());

        let config = config_from(&[("JWT_SECRET", "s3cret")]);
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn cookie_settings_are_parsed() {
        let config = config_from(&[("COOKIE_SECURE", "true"), ("COOKIE_SAME_SITE", "strict")]);
        assert_eq!(config.cookie_secure, CookieSecurity::Always);
        assert_eq!(config.cookie_same_site, SameSite::Strict);

        let config = config_from(&[("COOKIE_SECURE", "false"), ("COOKIE_SAME_SITE", "bogus")]);
        assert_eq!(config.cookie_secure, CookieSecurity::Never);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
    }

    #[test]
    fn production_mode_raises_pool_size() {
        let config = config_from(&[("APP_ENV", "Production")]);
        assert!(config.production_mode);
        assert_eq!(config.database_max_connections, 10);
    }

    #[test]
    fn rate_limit_overrides_keep_bucket_names() {
        let config = config_from(&[
            ("RATE_LIMIT_LOGIN_MAX_REQUESTS", "3"),
            ("RATE_LIMIT_LOGIN_WINDOW_SECONDS", "120"),
            ("RATE_LIMIT_STATS_READ_MAX_REQUESTS", "0"),
            ("RATE_LIMIT_LIKE_TOGGLE_MAX_REQUESTS", "abc"),
        ]);
        assert_eq!(config.rate_limits.login.bucket, "login");
        assert_eq!(config.rate_limits.login.max_requests, 3);
        assert_eq!(config.rate_limits.login.window, Duration::from_secs(120));
        assert_eq!(config.rate_limits.stats_read.max_requests, 1);
        assert_eq!(config.rate_limits.like_toggle.max_requests, 20);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "CORS_ALLOW_ORIGINS",
            "https://blog.example.com, https://admin.example.com,,",
        )]);
        assert_eq!(
            config.cors_allow_origins,
            vec!["https://blog.example.com", "https://admin.example.com"]
        );
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let vars: HashMap<&str, &str> = [("SERVER_ADDR", "not-an-addr")].into_iter().collect();
        let result = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert!(result.is_err());
    }
}
