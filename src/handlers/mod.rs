pub mod analytics;
pub mod attendance;
pub mod classes;
pub mod identity;
pub mod students;
pub mod teachers;
pub mod tenants;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::store::StoreHandle;

/// Parse an action payload into its typed shape.
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::bad_request(format!("Invalid payload: {}", e)))
}

/// Serialize stored fields; serialization of our own types failing is a bug.
pub(crate) fn encode_fields<T: Serialize>(fields: &T) -> Result<Value, ApiError> {
    serde_json::to_value(fields).map_err(|e| {
        tracing::error!("failed to encode record fields: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}

/// Merge a store-assigned id into a record's fields under the entity's id key.
pub(crate) fn with_id(id_field: &str, id: Uuid, fields: &Value) -> Value {
    let mut object = fields.as_object().cloned().unwrap_or_default();
    object.insert(id_field.to_string(), json!(id));
    Value::Object(object)
}

pub(crate) fn require_store(ctx: &IdentityContext) -> Result<StoreHandle, ApiError> {
    ctx.store
        .ok_or_else(|| ApiError::forbidden("No tenant store for this caller"))
}

pub(crate) fn require_tenant(ctx: &IdentityContext) -> Result<Uuid, ApiError> {
    ctx.tenant_id
        .ok_or_else(|| ApiError::forbidden("No tenant context for this caller"))
}
