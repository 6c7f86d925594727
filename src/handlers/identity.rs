// Identity and session actions: who am I, PIN verification, explicit re-lock.

use serde_json::{json, Value};

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::state::AppState;

use super::require_tenant;

/// verifyAuth - zero-privilege identity echo, available to every role.
pub fn verify_auth(ctx: &IdentityContext) -> Result<Value, ApiError> {
    Ok(json!({
        "role": ctx.role,
        "tenantId": ctx.tenant_id,
        "name": ctx.display_name,
    }))
}

/// verifyPin - check the supplied PIN against the tenant's stored hash.
/// Success elevates the caller's session; failure reports `unlocked: false`
/// without distinguishing why.
pub fn verify_pin(
    state: &AppState,
    ctx: &IdentityContext,
    pin: Option<&str>,
) -> Result<Value, ApiError> {
    let tenant_id = require_tenant(ctx)?;
    let tenant = state.registry.find_by_id(tenant_id).ok_or_else(|| {
        tracing::error!(%tenant_id, "resolved tenant missing from registry");
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    let unlocked = match pin {
        Some(pin) => state
            .sessions
            .check_pin(tenant_id, &ctx.email, pin, &tenant.pin_hash),
        None => false,
    };
    Ok(json!({ "unlocked": unlocked }))
}

/// lockSession - clear the caller's elevation (logout path).
pub fn lock_session(state: &AppState, ctx: &IdentityContext) -> Result<Value, ApiError> {
    let tenant_id = require_tenant(ctx)?;
    state.sessions.lock(tenant_id, &ctx.email);
    Ok(json!({}))
}
