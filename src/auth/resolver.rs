// Tenant/Role Resolver - maps a verified email to a role and, for
// tenant-scoped roles, the tenant and its store handle. Computed fresh on
// every call; nothing here is session state.

use uuid::Uuid;

use crate::registry::TenantRegistry;
use crate::store::StoreHandle;
use crate::types::Role;

use super::VerifiedIdentity;

/// Per-call identity context. Never persisted.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub tenant_id: Option<Uuid>,
    pub store: Option<StoreHandle>,
}

/// Resolve a verified identity to its role and tenant. Strict order, first
/// match wins: super admin, then tenant admin, then indexed teacher, then
/// guest.
pub fn resolve(
    identity: &VerifiedIdentity,
    super_admin_email: &str,
    registry: &TenantRegistry,
) -> IdentityContext {
    let email = identity.email.as_str();

    if !super_admin_email.is_empty() && email.eq_ignore_ascii_case(super_admin_email) {
        return IdentityContext {
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role: Role::SuperAdmin,
            tenant_id: None,
            store: None,
        };
    }

    if let Some(tenant) = registry.find_by_admin_email(email) {
        return IdentityContext {
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role: Role::InstitutionAdmin,
            tenant_id: Some(tenant.tenant_id),
            store: Some(tenant.store_handle),
        };
    }

    if let Some(tenant) = registry.find_by_teacher_email(email) {
        return IdentityContext {
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role: Role::Teacher,
            tenant_id: Some(tenant.tenant_id),
            store: Some(tenant.store_handle),
        };
    }

    IdentityContext {
        email: identity.email.clone(),
        display_name: identity.display_name.clone(),
        role: Role::Guest,
        tenant_id: None,
        store: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryEngine;

    fn identity(email: &str) -> VerifiedIdentity {
        VerifiedIdentity {
            email: email.to_string(),
            display_name: "Someone".to_string(),
            picture_url: String::new(),
        }
    }

    async fn registry_with_tenant() -> (TenantRegistry, crate::registry::Tenant) {
        let registry = TenantRegistry::new();
        let engine = MemoryEngine::new();
        let tenant = registry
            .create_tenant("Acme", "admin@acme.test", "basic", &engine, "123456", 4)
            .await
            .unwrap();
        (registry, tenant)
    }

    #[tokio::test]
    async fn super_admin_email_wins_over_everything() {
        let (registry, _) = registry_with_tenant().await;
        let ctx = resolve(&identity("ROOT@localhost"), "root@localhost", &registry);
        assert_eq!(ctx.role, Role::SuperAdmin);
        assert!(ctx.tenant_id.is_none());
        assert!(ctx.store.is_none());
    }

    #[tokio::test]
    async fn admin_email_resolves_to_institution_admin_with_store() {
        let (registry, tenant) = registry_with_tenant().await;
        let ctx = resolve(&identity("admin@acme.test"), "root@localhost", &registry);
        assert_eq!(ctx.role, Role::InstitutionAdmin);
        assert_eq!(ctx.tenant_id, Some(tenant.tenant_id));
        assert_eq!(ctx.store, Some(tenant.store_handle));
    }

    #[tokio::test]
    async fn indexed_teacher_resolves_to_teacher_role() {
        let (registry, tenant) = registry_with_tenant().await;
        registry.index_teacher("teacher@acme.test", tenant.tenant_id);
        let ctx = resolve(&identity("teacher@acme.test"), "root@localhost", &registry);
        assert_eq!(ctx.role, Role::Teacher);
        assert_eq!(ctx.tenant_id, Some(tenant.tenant_id));
        assert_eq!(ctx.store, Some(tenant.store_handle));
    }

    #[tokio::test]
    async fn unknown_email_is_a_guest_with_no_tenant() {
        let (registry, _) = registry_with_tenant().await;
        let ctx = resolve(&identity("nobody@nowhere.test"), "root@localhost", &registry);
        assert_eq!(ctx.role, Role::Guest);
        assert!(ctx.tenant_id.is_none());
        assert!(ctx.store.is_none());
    }
}
