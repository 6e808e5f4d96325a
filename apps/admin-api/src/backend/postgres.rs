//! PostgreSQL tenant backend.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use super::{BackendResult, ProfileRecord, SubscriptionRecord, TenantBackend, UserRecord};
use crate::auth::Capability;

/// Database connection pool.
#[derive(Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Connect to the database.
    pub async fn connect(url: &str) -> BackendResult<Self> {
        let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
        Ok(PostgresBackend { pool })
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> BackendResult<()> {
        sqlx::migrate!("../../migrations/postgres")
            .run(&self.pool)
            .await
            .map_err(|e| super::BackendError::Database(e.to_string()))?;
        info!("Tenant migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TenantBackend for PostgresBackend {
    async fn find_user_by_email(&self, email: &str) -> BackendResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email FROM auth_users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> BackendResult<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO auth_users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_profile(&self, user_id: Uuid) -> BackendResult<Option<ProfileRecord>> {
        let profile = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT user_id, company_id, company_name, email, role
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn upsert_profile(&self, profile: &ProfileRecord) -> BackendResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, company_id, company_name, email, role, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                company_name = EXCLUDED.company_name,
                email = EXCLUDED.email,
                role = EXCLUDED.role,
                updated_at = NOW()
            "#,
        )
        .bind(profile.user_id)
        .bind(profile.company_id)
        .bind(&profile.company_name)
        .bind(&profile.email)
        .bind(&profile.role)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert_subscription(&self, subscription: &SubscriptionRecord) -> BackendResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (company_id, status, expires_at, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (company_id) DO UPDATE SET
                status = EXCLUDED.status,
                expires_at = EXCLUDED.expires_at,
                updated_at = NOW()
            "#,
        )
        .bind(subscription.company_id)
        .bind(&subscription.status)
        .bind(subscription.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_profile(&self, user_id: Uuid) -> BackendResult<()> {
        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> BackendResult<()> {
        sqlx::query("DELETE FROM auth_users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn has_capability(&self, user_id: Uuid, capability: Capability) -> BackendResult<bool> {
        let granted: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM platform_roles
                WHERE user_id = $1 AND capability = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(capability.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(granted)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
