//! Admin account storage.
//!
//! The [`AdminStore`] trait is the identity capability consumed by the auth
//! gate and the login handler. It can be mocked with `MockAdminStore` in tests.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::admin::{AdminCredentials, AdminIdentity, AdminProfile, UpdateProfilePayload};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Resolves a token subject to the stored identity, `None` when unknown.
    async fn resolve_identity(&self, user_id: &str) -> anyhow::Result<Option<AdminIdentity>>;

    /// Loads the password hash for a login attempt.
    async fn find_credentials(&self, user_id: &str) -> anyhow::Result<Option<AdminCredentials>>;
}

/// PostgreSQL-backed [`AdminStore`] over the `admin_profile` table.
#[derive(Debug, Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn resolve_identity(&self, user_id: &str) -> anyhow::Result<Option<AdminIdentity>> {
        let identity =
            sqlx::query_as::<_, AdminIdentity>("SELECT id, name FROM admin_profile WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(identity)
    }

    async fn find_credentials(&self, user_id: &str) -> anyhow::Result<Option<AdminCredentials>> {
        let credentials = sqlx::query_as::<_, AdminCredentials>(
            "SELECT id, name, password_hash FROM admin_profile WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }
}

const PROFILE_COLUMNS: &str =
    "id, name, email, avatar_url, github_username, bio, created_at, updated_at";

/// Finds the profile for the given admin id.
pub async fn find_profile(pool: &PgPool, id: &str) -> Result<Option<AdminProfile>, sqlx::Error> {
    sqlx::query_as::<_, AdminProfile>(&format!(
        "SELECT {} FROM admin_profile WHERE id = $1",
        PROFILE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Finds the blog owner's profile. With a single admin this is the oldest row.
pub async fn find_owner_profile(pool: &PgPool) -> Result<Option<AdminProfile>, sqlx::Error> {
    sqlx::query_as::<_, AdminProfile>(&format!(
        "SELECT {} FROM admin_profile ORDER BY created_at ASC LIMIT 1",
        PROFILE_COLUMNS
    ))
    .fetch_optional(pool)
    .await
}

/// Updates editable profile fields and returns the new row.
pub async fn update_profile(
    pool: &PgPool,
    id: &str,
    payload: &UpdateProfilePayload,
) -> Result<Option<AdminProfile>, sqlx::Error> {
    sqlx::query_as::<_, AdminProfile>(&format!(
        "UPDATE admin_profile SET name = $2, email = $3, avatar_url = $4, \
         github_username = $5, bio = $6, updated_at = NOW() WHERE id = $1 RETURNING {}",
        PROFILE_COLUMNS
    ))
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.avatar_url)
    .bind(&payload.github_username)
    .bind(&payload.bio)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_store_resolves_configured_identity() {
        let mut store = MockAdminStore::new();
        store
            .expect_resolve_identity()
            .withf(|id| id == "admin")
            .returning(|_| {
                Ok(Some(AdminIdentity {
                    id: "admin".into(),
                    name: "Owner".into(),
                }))
            });

        let identity = store.resolve_identity("admin").await.unwrap().unwrap();
        assert_eq!(identity.name, "Owner");
    }

    #[test]
    fn stores_are_send_and_sync() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockAdminStore>();
        check_send_sync::<PgAdminStore>();
    }
}
