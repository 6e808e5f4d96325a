//! In-memory tenant backend for tests and local runs.
//!
//! Any operation can be made to fail with [`InMemoryBackend::fail_on`], which
//! is how the compensation path of provisioning is exercised.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{BackendError, BackendResult, ProfileRecord, SubscriptionRecord, TenantBackend, UserRecord};
use crate::auth::Capability;

/// Backend operations that can be failed on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FindUser,
    CreateUser,
    FindProfile,
    UpsertProfile,
    UpsertSubscription,
    DeleteProfile,
    DeleteUser,
    HasCapability,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    profiles: HashMap<Uuid, ProfileRecord>,
    subscriptions: HashMap<Uuid, SubscriptionRecord>,
    roles: HashSet<(Uuid, Capability)>,
    failing: HashSet<Operation>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to `op` fail with `BackendError::Unavailable`.
    pub async fn fail_on(&self, op: Operation) {
        self.tables.lock().await.failing.insert(op);
    }

    pub async fn grant(&self, user_id: Uuid, capability: Capability) {
        self.tables.lock().await.roles.insert((user_id, capability));
    }

    /// Insert a user directly, bypassing password hashing.
    pub async fn insert_user(&self, email: &str) -> UserRecord {
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        self.tables.lock().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }

    pub async fn profile(&self, user_id: Uuid) -> Option<ProfileRecord> {
        self.tables.lock().await.profiles.get(&user_id).cloned()
    }

    pub async fn subscription(&self, company_id: Uuid) -> Option<SubscriptionRecord> {
        self.tables.lock().await.subscriptions.get(&company_id).cloned()
    }
}

fn check(tables: &Tables, op: Operation) -> BackendResult<()> {
    if tables.failing.contains(&op) {
        return Err(BackendError::Unavailable(format!("{:?} failed", op)));
    }
    Ok(())
}

#[async_trait]
impl TenantBackend for InMemoryBackend {
    async fn find_user_by_email(&self, email: &str) -> BackendResult<Option<UserRecord>> {
        let tables = self.tables.lock().await;
        check(&tables, Operation::FindUser)?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, email: &str, _password_hash: &str) -> BackendResult<UserRecord> {
        let mut tables = self.tables.lock().await;
        check(&tables, Operation::CreateUser)?;

        if tables.users.values().any(|u| u.email == email) {
            return Err(BackendError::Conflict(format!("user {} already exists", email)));
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_profile(&self, user_id: Uuid) -> BackendResult<Option<ProfileRecord>> {
        let tables = self.tables.lock().await;
        check(&tables, Operation::FindProfile)?;
        Ok(tables.profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &ProfileRecord) -> BackendResult<()> {
        let mut tables = self.tables.lock().await;
        check(&tables, Operation::UpsertProfile)?;
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn upsert_subscription(&self, subscription: &SubscriptionRecord) -> BackendResult<()> {
        let mut tables = self.tables.lock().await;
        check(&tables, Operation::UpsertSubscription)?;
        tables
            .subscriptions
            .insert(subscription.company_id, subscription.clone());
        Ok(())
    }

    async fn delete_profile(&self, user_id: Uuid) -> BackendResult<()> {
        let mut tables = self.tables.lock().await;
        check(&tables, Operation::DeleteProfile)?;
        tables.profiles.remove(&user_id);
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> BackendResult<()> {
        let mut tables = self.tables.lock().await;
        check(&tables, Operation::DeleteUser)?;
        tables.users.remove(&user_id);
        tables.roles.retain(|(id, _)| *id != user_id);
        Ok(())
    }

    async fn has_capability(&self, user_id: Uuid, capability: Capability) -> BackendResult<bool> {
        let tables = self.tables.lock().await;
        check(&tables, Operation::HasCapability)?;
        Ok(tables.roles.contains(&(user_id, capability)))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let backend = InMemoryBackend::new();
        let user = backend.create_user("dono@loja.com", "hash").await.unwrap();

        let found = backend.find_user_by_email("dono@loja.com").await.unwrap();
        assert_eq!(found, Some(user));

        let dup = backend.create_user("dono@loja.com", "hash").await;
        assert!(matches!(dup, Err(BackendError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let backend = InMemoryBackend::new();
        backend.fail_on(Operation::CreateUser).await;

        let result = backend.create_user("a@b.co", "hash").await;
        assert!(matches!(result, Err(BackendError::Unavailable(_))));
        assert_eq!(backend.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_capability_grant() {
        let backend = InMemoryBackend::new();
        let user = backend.insert_user("ops@caixa.app").await;

        assert!(!backend.has_capability(user.id, Capability::ProvisionTenants).await.unwrap());
        backend.grant(user.id, Capability::ProvisionTenants).await;
        assert!(backend.has_capability(user.id, Capability::ProvisionTenants).await.unwrap());
    }
}
