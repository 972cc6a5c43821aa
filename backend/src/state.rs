use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    repositories::admin::{AdminStore, PgAdminStore},
    services::{auth_gate::AuthGate, rate_limit::RateLimiter},
    utils::jwt::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub tokens: TokenService,
    pub admins: Arc<dyn AdminStore>,
    pub auth_gate: AuthGate,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Production wiring: admins come from PostgreSQL, rate limits are kept in memory.
    pub fn new(pool: PgPool, config: Config) -> Self {
        let admins: Arc<dyn AdminStore> = Arc::new(PgAdminStore::new(pool.clone()));
        Self::with_parts(pool, config, admins, RateLimiter::in_memory())
    }

    /// Builds state around injected collaborators.
    pub fn with_parts(
        pool: PgPool,
        config: Config,
        admins: Arc<dyn AdminStore>,
        rate_limiter: RateLimiter,
    ) -> Self {
        let tokens = TokenService::new(config.jwt_secret.as_deref());
        let auth_gate = AuthGate::new(tokens.clone(), admins.clone());
        Self {
            pool,
            config,
            tokens,
            admins,
            auth_gate,
            rate_limiter,
        }
    }
}
