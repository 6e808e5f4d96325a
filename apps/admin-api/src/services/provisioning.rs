//! # Tenant Provisioning
//!
//! Creates a company with its first administrator and a subscription.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate request                                   ── fail ──► 400     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find user by email ── found ──► reuse (reusedExistingUser = true)      │
//! │       │ not found                                                       │
//! │       ▼                                                                 │
//! │  hash password (argon2), create user          [created_user]            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  existing profile? keep its company id : new company id                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  upsert profile (role admin)                  [created_profile]         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  upsert subscription (active, now + days)                               │
//! │                                                                         │
//! │  Any backend failure after a step above succeeded:                      │
//! │    delete profile if created_profile, delete user if created_user,      │
//! │    each failure only logged; the original error is returned.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use caixa_core::validation::{
    validate_company_name, validate_days_given, validate_email, validate_password,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{ProfileRecord, SubscriptionRecord, TenantBackend, ACTIVE_STATUS, ADMIN_ROLE};
use crate::error::{AdminError, AdminResult};

/// Body of `POST /api/tenants`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub admin_email: String,
    #[serde(default)]
    pub admin_password: String,
    pub days_given: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionResponse {
    pub success: bool,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub admin_email: String,
    pub reused_existing_user: bool,
}

/// A request that passed validation, with the email normalized.
#[derive(Debug, Clone)]
struct ValidTenant {
    company_name: String,
    email: String,
    password: String,
    days_given: i64,
}

fn validate(request: ProvisionRequest, default_days: i64) -> AdminResult<ValidTenant> {
    validate_company_name(&request.company_name)?;
    validate_email(&request.admin_email)?;
    validate_password(&request.admin_password)?;

    let days_given = request.days_given.unwrap_or(default_days);
    validate_days_given(days_given)?;

    Ok(ValidTenant {
        company_name: request.company_name.trim().to_string(),
        email: request.admin_email.trim().to_ascii_lowercase(),
        password: request.admin_password,
        days_given,
    })
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> AdminResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminError::Internal(format!("Failed to hash password: {}", e)))
}

/// What this request created, so it can be undone.
#[derive(Debug, Default)]
struct Created {
    user: Option<Uuid>,
    profile: Option<Uuid>,
}

/// Provision a tenant against `backend`, stamping the subscription from `now`.
pub async fn provision_tenant(
    backend: &dyn TenantBackend,
    request: ProvisionRequest,
    default_days: i64,
    now: DateTime<Utc>,
) -> AdminResult<ProvisionResponse> {
    let tenant = validate(request, default_days)?;
    let mut created = Created::default();

    match run_steps(backend, &tenant, now, &mut created).await {
        Ok(response) => {
            info!(
                company_id = %response.company_id,
                user_id = %response.user_id,
                reused = response.reused_existing_user,
                days = tenant.days_given,
                "Tenant provisioned"
            );
            Ok(response)
        }
        Err(err) => {
            compensate(backend, &created).await;
            Err(err)
        }
    }
}

async fn run_steps(
    backend: &dyn TenantBackend,
    tenant: &ValidTenant,
    now: DateTime<Utc>,
    created: &mut Created,
) -> AdminResult<ProvisionResponse> {
    let (user, reused) = match backend.find_user_by_email(&tenant.email).await? {
        Some(user) => (user, true),
        None => {
            let hash = hash_password(&tenant.password)?;
            let user = backend.create_user(&tenant.email, &hash).await?;
            created.user = Some(user.id);
            (user, false)
        }
    };

    let existing = backend.find_profile(user.id).await?;
    let company_id = existing
        .as_ref()
        .map(|profile| profile.company_id)
        .unwrap_or_else(Uuid::new_v4);

    backend
        .upsert_profile(&ProfileRecord {
            user_id: user.id,
            company_id,
            company_name: tenant.company_name.clone(),
            email: tenant.email.clone(),
            role: ADMIN_ROLE.to_string(),
        })
        .await?;
    if existing.is_none() {
        created.profile = Some(user.id);
    }

    backend
        .upsert_subscription(&SubscriptionRecord {
            company_id,
            status: ACTIVE_STATUS.to_string(),
            expires_at: now + Duration::days(tenant.days_given),
        })
        .await?;

    Ok(ProvisionResponse {
        success: true,
        company_id,
        user_id: user.id,
        admin_email: tenant.email.clone(),
        reused_existing_user: reused,
    })
}

/// Best-effort undo, profile before user.
async fn compensate(backend: &dyn TenantBackend, created: &Created) {
    if let Some(user_id) = created.profile {
        match backend.delete_profile(user_id).await {
            Ok(()) => info!(user_id = %user_id, "Compensation: profile removed"),
            Err(e) => warn!(user_id = %user_id, error = %e, "Compensation: failed to remove profile"),
        }
    }

    if let Some(user_id) = created.user {
        match backend.delete_user(user_id).await {
            Ok(()) => info!(user_id = %user_id, "Compensation: user removed"),
            Err(e) => warn!(user_id = %user_id, error = %e, "Compensation: failed to remove user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::Operation;
    use crate::backend::InMemoryBackend;

    fn request(email: &str) -> ProvisionRequest {
        ProvisionRequest {
            company_name: "Mercadinho Boa Vista".to_string(),
            admin_email: email.to_string(),
            admin_password: "segredo123".to_string(),
            days_given: None,
        }
    }

    #[tokio::test]
    async fn test_provision_new_tenant() {
        let backend = InMemoryBackend::new();
        let now = Utc::now();

        let response = provision_tenant(&backend, request(" Dono@Loja.com "), 30, now)
            .await
            .unwrap();

        assert!(response.success);
        assert!(!response.reused_existing_user);
        assert_eq!(response.admin_email, "dono@loja.com");

        let profile = backend.profile(response.user_id).await.unwrap();
        assert_eq!(profile.company_id, response.company_id);
        assert_eq!(profile.role, "admin");

        let subscription = backend.subscription(response.company_id).await.unwrap();
        assert_eq!(subscription.status, "active");
        assert_eq!(subscription.expires_at, now + Duration::days(30));
    }

    #[tokio::test]
    async fn test_existing_user_is_reused() {
        let backend = InMemoryBackend::new();
        let first = provision_tenant(&backend, request("dono@loja.com"), 30, Utc::now())
            .await
            .unwrap();

        let mut again = request("dono@loja.com");
        again.days_given = Some(365);
        let second = provision_tenant(&backend, again, 30, Utc::now()).await.unwrap();

        assert!(second.reused_existing_user);
        assert_eq!(second.user_id, first.user_id);
        assert_eq!(second.company_id, first.company_id);
        assert_eq!(backend.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_subscription_failure_rolls_back_new_user() {
        let backend = InMemoryBackend::new();
        backend.fail_on(Operation::UpsertSubscription).await;

        let err = provision_tenant(&backend, request("novo@loja.com"), 30, Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::Backend(_)));
        assert_eq!(backend.user_count().await, 0);
        assert!(backend.find_user_by_email("novo@loja.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_reused_user_and_profile() {
        let backend = InMemoryBackend::new();
        let first = provision_tenant(&backend, request("dono@loja.com"), 30, Utc::now())
            .await
            .unwrap();

        backend.fail_on(Operation::UpsertSubscription).await;
        let result = provision_tenant(&backend, request("dono@loja.com"), 30, Utc::now()).await;

        assert!(result.is_err());
        assert_eq!(backend.user_count().await, 1);
        assert!(backend.profile(first.user_id).await.is_some());
    }

    #[tokio::test]
    async fn test_failed_compensation_still_returns_original_error() {
        let backend = InMemoryBackend::new();
        backend.fail_on(Operation::UpsertProfile).await;
        backend.fail_on(Operation::DeleteUser).await;

        let err = provision_tenant(&backend, request("novo@loja.com"), 30, Utc::now())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("UpsertProfile"));
        assert_eq!(backend.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_validation_runs_before_backend() {
        let backend = InMemoryBackend::new();

        let mut bad = request("dono@loja.com");
        bad.admin_password = "123".to_string();
        let err = provision_tenant(&backend, bad, 30, Utc::now()).await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidRequest(_)));

        let mut bad = request("dono@loja.com");
        bad.days_given = Some(0);
        assert!(provision_tenant(&backend, bad, 30, Utc::now()).await.is_err());

        assert!(provision_tenant(&backend, request("sem-arroba"), 30, Utc::now())
            .await
            .is_err());
        assert_eq!(backend.user_count().await, 0);
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("segredo123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, hash_password("segredo123").unwrap());
    }
}
