// Teacher CRUD for an unlocked institution admin. Create/update/delete also
// maintain the registry's global teacher-email index so teachers can later
// resolve to their tenant.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{Collection, Row};

use super::{encode_fields, parse_payload, require_store, require_tenant, with_id};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub classes: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeacherPayload {
    teacher_id: Uuid,
    #[serde(flatten)]
    body: TeacherBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeacherRef {
    teacher_id: Uuid,
}

/// getTeachers
pub async fn get_all(state: &AppState, ctx: &IdentityContext) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let rows = state.engine.list(handle, Collection::Teachers).await?;
    let teachers: Vec<Value> = rows
        .iter()
        .map(|row| with_id("teacherId", row.id, &row.fields))
        .collect();
    Ok(json!(teachers))
}

/// createTeacher
pub async fn create(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let tenant_id = require_tenant(ctx)?;
    let body: TeacherBody = parse_payload(payload)?;
    if body.email.trim().is_empty() {
        return Err(ApiError::bad_request("Teacher email must not be empty"));
    }

    let fields = encode_fields(&body)?;
    let id = state
        .engine
        .insert(handle, Collection::Teachers, fields.clone())
        .await?;
    state.registry.index_teacher(&body.email, tenant_id);

    Ok(with_id("teacherId", id, &fields))
}

/// updateTeacher
pub async fn update(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let tenant_id = require_tenant(ctx)?;
    let p: UpdateTeacherPayload = parse_payload(payload)?;
    if p.body.email.trim().is_empty() {
        return Err(ApiError::bad_request("Teacher email must not be empty"));
    }

    let rows = state.engine.list(handle, Collection::Teachers).await?;
    let existing = find_teacher(&rows, p.teacher_id)?;
    let previous_email = teacher_email(existing);

    let fields = encode_fields(&p.body)?;
    state
        .engine
        .update(handle, Collection::Teachers, p.teacher_id, fields.clone())
        .await?;

    if let Some(previous) = previous_email {
        if !previous.eq_ignore_ascii_case(&p.body.email) {
            state.registry.unindex_teacher(&previous);
        }
    }
    state.registry.index_teacher(&p.body.email, tenant_id);

    Ok(with_id("teacherId", p.teacher_id, &fields))
}

/// deleteTeacher
pub async fn delete(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let p: TeacherRef = parse_payload(payload)?;

    let rows = state.engine.list(handle, Collection::Teachers).await?;
    let existing = find_teacher(&rows, p.teacher_id)?;
    let email = teacher_email(existing);

    state
        .engine
        .delete(handle, Collection::Teachers, p.teacher_id)
        .await?;
    if let Some(email) = email {
        state.registry.unindex_teacher(&email);
    }

    Ok(json!({}))
}

fn find_teacher(rows: &[Row], id: Uuid) -> Result<&Row, ApiError> {
    rows.iter()
        .find(|row| row.id == id)
        .ok_or_else(|| ApiError::not_found(format!("No Teachers record with id {}", id)))
}

fn teacher_email(row: &Row) -> Option<String> {
    row.fields
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string)
}
