// Tenant Registry - the single global table mapping tenant ids to admin
// email, PIN hash, and store handle. Consulted by the resolver on every call
// and mutated only by super-admin provisioning and teacher-index upkeep.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::json;
use uuid::Uuid;

use crate::store::{Collection, StoreHandle, StoreError, TableStore};

#[derive(Debug, Clone)]
pub struct Tenant {
    pub tenant_id: Uuid,
    pub institution_name: String,
    pub plan: String,
    pub admin_email: String,
    /// bcrypt hash of the admin PIN; the plaintext is never stored.
    pub pin_hash: String,
    pub store_handle: StoreHandle,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("admin email already registered: {0}")]
    AdminEmailTaken(String),
    #[error("invalid institution name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("pin hashing failed: {0}")]
    PinHash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Default)]
struct RegistryInner {
    tenants: Vec<Tenant>,
    /// Global teacher email -> tenant id index, maintained by teacher CRUD,
    /// so teacher identities resolve without scanning every tenant store.
    teacher_index: HashMap<String, Uuid>,
}

/// Classes seeded into every freshly provisioned tenant store.
const DEFAULT_CLASSES: &[(&str, &str)] = &[
    ("Computer Science 101", "Mon 10am"),
    ("Mathematics", "Tue 10am"),
];

#[derive(Debug, Default)]
pub struct TenantRegistry {
    inner: RwLock<RegistryInner>,
}

impl TenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a new tenant: hash the default admin PIN, allocate an
    /// isolated store pre-seeded with the default classes, and append the
    /// tenant record.
    pub async fn create_tenant(
        &self,
        name: &str,
        admin_email: &str,
        plan: &str,
        engine: &dyn TableStore,
        default_pin: &str,
        bcrypt_cost: u32,
    ) -> Result<Tenant, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::InvalidName(
                "institution name must not be empty".to_string(),
            ));
        }
        if self.find_by_admin_email(admin_email).is_some() {
            return Err(RegistryError::AdminEmailTaken(admin_email.to_string()));
        }

        let pin_hash = bcrypt::hash(default_pin, bcrypt_cost)?;

        let store_handle = engine.create_store().await?;
        for (class_name, schedule) in DEFAULT_CLASSES {
            engine
                .insert(
                    store_handle,
                    Collection::Classes,
                    json!({ "name": class_name, "schedule": schedule }),
                )
                .await?;
        }

        let tenant = Tenant {
            tenant_id: Uuid::new_v4(),
            institution_name: name.to_string(),
            plan: plan.to_string(),
            admin_email: admin_email.to_string(),
            pin_hash,
            store_handle,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write();
        // Re-check under the write lock; provisioning raced another request
        if inner
            .tenants
            .iter()
            .any(|t| t.admin_email.eq_ignore_ascii_case(admin_email))
        {
            return Err(RegistryError::AdminEmailTaken(admin_email.to_string()));
        }
        inner.tenants.push(tenant.clone());

        tracing::info!(
            tenant_id = %tenant.tenant_id,
            institution = %tenant.institution_name,
            "provisioned tenant"
        );
        Ok(tenant)
    }

    pub fn list(&self) -> Vec<Tenant> {
        self.inner.read().tenants.clone()
    }

    pub fn find_by_id(&self, tenant_id: Uuid) -> Option<Tenant> {
        self.inner
            .read()
            .tenants
            .iter()
            .find(|t| t.tenant_id == tenant_id)
            .cloned()
    }

    pub fn find_by_admin_email(&self, email: &str) -> Option<Tenant> {
        self.inner
            .read()
            .tenants
            .iter()
            .find(|t| t.admin_email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Tenant a teacher email belongs to, per the global teacher index.
    pub fn find_by_teacher_email(&self, email: &str) -> Option<Tenant> {
        let inner = self.inner.read();
        let tenant_id = *inner.teacher_index.get(&email.to_ascii_lowercase())?;
        inner
            .tenants
            .iter()
            .find(|t| t.tenant_id == tenant_id)
            .cloned()
    }

    pub fn index_teacher(&self, email: &str, tenant_id: Uuid) {
        self.inner
            .write()
            .teacher_index
            .insert(email.to_ascii_lowercase(), tenant_id);
    }

    pub fn unindex_teacher(&self, email: &str) {
        self.inner
            .write()
            .teacher_index
            .remove(&email.to_ascii_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryEngine;

    const TEST_BCRYPT_COST: u32 = 4;

    #[tokio::test]
    async fn provisioning_seeds_default_classes_and_hashes_the_pin() {
        let engine = MemoryEngine::new();
        let registry = TenantRegistry::new();

        let tenant = registry
            .create_tenant("Acme", "admin@acme.test", "basic", &engine, "123456", TEST_BCRYPT_COST)
            .await
            .unwrap();

        let classes = engine
            .list(tenant.store_handle, Collection::Classes)
            .await
            .unwrap();
        assert_eq!(classes.len(), DEFAULT_CLASSES.len());
        assert!(engine
            .list(tenant.store_handle, Collection::Teachers)
            .await
            .unwrap()
            .is_empty());

        // Stored hash verifies the PIN but never equals it
        assert_ne!(tenant.pin_hash, "123456");
        assert!(bcrypt::verify("123456", &tenant.pin_hash).unwrap());
        assert!(!bcrypt::verify("000000", &tenant.pin_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_admin_email_is_rejected() {
        let engine = MemoryEngine::new();
        let registry = TenantRegistry::new();

        registry
            .create_tenant("Acme", "admin@acme.test", "basic", &engine, "123456", TEST_BCRYPT_COST)
            .await
            .unwrap();
        let err = registry
            .create_tenant("Other", "Admin@Acme.Test", "basic", &engine, "123456", TEST_BCRYPT_COST)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::AdminEmailTaken(_)));
        assert_eq!(registry.list().len(), 1);
    }

    #[tokio::test]
    async fn teacher_index_is_case_insensitive_and_removable() {
        let registry = TenantRegistry::new();
        let engine = MemoryEngine::new();
        let tenant = registry
            .create_tenant("Acme", "admin@acme.test", "basic", &engine, "123456", TEST_BCRYPT_COST)
            .await
            .unwrap();

        registry.index_teacher("T@School.Test", tenant.tenant_id);
        assert!(registry.find_by_teacher_email("t@school.test").is_some());

        registry.unindex_teacher("t@school.TEST");
        assert!(registry.find_by_teacher_email("t@school.test").is_none());
    }
}
