// Super-admin actions against the Tenant Registry.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

use super::parse_payload;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTenantPayload {
    name: String,
    email: String,
    #[serde(default = "default_plan")]
    plan: String,
}

fn default_plan() -> String {
    "basic".to_string()
}

/// getAllTenants
pub fn get_all(state: &AppState) -> Result<Value, ApiError> {
    let tenants: Vec<Value> = state
        .registry
        .list()
        .iter()
        .map(|t| {
            json!({
                "tenantId": t.tenant_id,
                "institutionName": t.institution_name,
                "plan": t.plan,
                "adminEmail": t.admin_email,
                "createdAt": t.created_at,
            })
        })
        .collect();
    Ok(json!(tenants))
}

/// createTenant - provisions the store and registers the tenant. The PIN
/// hash and store handle never appear in a response.
pub async fn create(state: &AppState, payload: Value) -> Result<Value, ApiError> {
    let p: CreateTenantPayload = parse_payload(payload)?;
    state
        .registry
        .create_tenant(
            &p.name,
            &p.email,
            &p.plan,
            state.engine.as_ref(),
            &state.config.security.default_admin_pin,
            state.config.security.bcrypt_cost,
        )
        .await?;
    Ok(json!({}))
}
