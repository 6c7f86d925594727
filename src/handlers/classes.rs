// Class views. Classes are read-mostly: created at tenant provisioning, no
// update or delete actions.

use std::collections::HashSet;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use crate::types::Role;

use super::{require_store, with_id};

/// getClasses - the full tenant class list (admin view).
pub async fn get_all(state: &AppState, ctx: &IdentityContext) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let rows = state.engine.list(handle, Collection::Classes).await?;
    let classes: Vec<Value> = rows
        .iter()
        .map(|row| with_id("classId", row.id, &row.fields))
        .collect();
    Ok(json!(classes))
}

/// getTeacherClasses - an admin sees every class; a teacher sees only the
/// classes assigned on their own teacher record.
pub async fn for_caller(state: &AppState, ctx: &IdentityContext) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let rows = state.engine.list(handle, Collection::Classes).await?;

    let assigned: Option<HashSet<Uuid>> = match ctx.role {
        Role::Teacher => Some(assigned_class_ids(state, ctx).await?),
        _ => None,
    };

    let classes: Vec<Value> = rows
        .iter()
        .filter(|row| assigned.as_ref().map_or(true, |set| set.contains(&row.id)))
        .map(|row| with_id("classId", row.id, &row.fields))
        .collect();
    Ok(json!(classes))
}

async fn assigned_class_ids(
    state: &AppState,
    ctx: &IdentityContext,
) -> Result<HashSet<Uuid>, ApiError> {
    let handle = require_store(ctx)?;
    let teachers = state.engine.list(handle, Collection::Teachers).await?;

    let mine = teachers.iter().find(|row| {
        row.fields
            .get("email")
            .and_then(Value::as_str)
            .map(|email| email.eq_ignore_ascii_case(&ctx.email))
            .unwrap_or(false)
    });

    let ids: Vec<Uuid> = match mine.and_then(|row| row.fields.get("classes")) {
        Some(classes) => serde_json::from_value(classes.clone()).unwrap_or_default(),
        None => Vec::new(),
    };
    Ok(ids.into_iter().collect())
}
