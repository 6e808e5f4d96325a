//! # Tenant Backend
//!
//! The identity and tenant store the provisioner talks to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     dyn TenantBackend                                   │
//! │                                                                         │
//! │  ┌───────────────────────────┐      ┌───────────────────────────────┐  │
//! │  │  PostgresBackend          │      │  InMemoryBackend              │  │
//! │  │  auth_users, profiles,    │      │  HashMaps behind a Mutex,     │  │
//! │  │  subscriptions,           │      │  optional failure injection   │  │
//! │  │  platform_roles           │      │  for tests                    │  │
//! │  └───────────────────────────┘      └───────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each method is a single call with no cross-call transaction; the
//! provisioning service undoes partial work itself.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Capability;

pub use memory::InMemoryBackend;
pub use postgres::PostgresBackend;

/// Role given to the first account of a new company.
pub const ADMIN_ROLE: &str = "admin";

/// Status written for a freshly granted subscription.
pub const ACTIVE_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SubscriptionRecord {
    pub company_id: Uuid,
    pub status: String,
    pub expires_at: DateTime<Utc>,
}

/// Backend call failures.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                BackendError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                BackendError::Unavailable(err.to_string())
            }
            _ => BackendError::Database(err.to_string()),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Operations the provisioner needs from the identity/tenant store.
///
/// Emails are passed already normalized (trimmed, lowercase).
#[async_trait]
pub trait TenantBackend: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> BackendResult<Option<UserRecord>>;

    async fn create_user(&self, email: &str, password_hash: &str) -> BackendResult<UserRecord>;

    async fn find_profile(&self, user_id: Uuid) -> BackendResult<Option<ProfileRecord>>;

    /// Insert or replace the profile keyed by `user_id`.
    async fn upsert_profile(&self, profile: &ProfileRecord) -> BackendResult<()>;

    /// Insert or replace the subscription keyed by `company_id`.
    async fn upsert_subscription(&self, subscription: &SubscriptionRecord) -> BackendResult<()>;

    async fn delete_profile(&self, user_id: Uuid) -> BackendResult<()>;

    async fn delete_user(&self, user_id: Uuid) -> BackendResult<()>;

    async fn has_capability(&self, user_id: Uuid, capability: Capability) -> BackendResult<bool>;

    async fn health_check(&self) -> bool;
}
