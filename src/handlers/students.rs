// Student CRUD for an unlocked institution admin, plus the shared
// students-by-class view for teachers. A student's classId must reference an
// existing class in the same tenant.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;

use super::{encode_fields, parse_payload, require_store, with_id};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
    pub name: String,
    /// Free text; uniqueness is not enforced.
    pub roll_no: String,
    pub class_id: Uuid,
    #[serde(default)]
    pub parent_contact: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStudentPayload {
    student_id: Uuid,
    #[serde(flatten)]
    body: StudentBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentRef {
    student_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByClassPayload {
    class_id: Uuid,
}

/// getAllStudents
pub async fn get_all(state: &AppState, ctx: &IdentityContext) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let rows = state.engine.list(handle, Collection::Students).await?;
    let students: Vec<Value> = rows
        .iter()
        .map(|row| with_id("studentId", row.id, &row.fields))
        .collect();
    Ok(json!(students))
}

/// createStudent
pub async fn create(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let body: StudentBody = parse_payload(payload)?;
    ensure_class_exists(state, ctx, body.class_id).await?;

    let fields = encode_fields(&body)?;
    let id = state
        .engine
        .insert(handle, Collection::Students, fields.clone())
        .await?;
    Ok(with_id("studentId", id, &fields))
}

/// updateStudent
pub async fn update(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let p: UpdateStudentPayload = parse_payload(payload)?;
    ensure_class_exists(state, ctx, p.body.class_id).await?;

    let fields = encode_fields(&p.body)?;
    state
        .engine
        .update(handle, Collection::Students, p.student_id, fields.clone())
        .await?;
    Ok(with_id("studentId", p.student_id, &fields))
}

/// deleteStudent
pub async fn delete(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let p: StudentRef = parse_payload(payload)?;
    state
        .engine
        .delete(handle, Collection::Students, p.student_id)
        .await?;
    Ok(json!({}))
}

/// getStudentsByClass - shared teacher/admin view.
pub async fn by_class(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let p: ByClassPayload = parse_payload(payload)?;
    let class_id = json!(p.class_id);

    let rows = state.engine.list(handle, Collection::Students).await?;
    let students: Vec<Value> = rows
        .iter()
        .filter(|row| row.fields.get("classId") == Some(&class_id))
        .map(|row| with_id("studentId", row.id, &row.fields))
        .collect();
    Ok(json!(students))
}

async fn ensure_class_exists(
    state: &AppState,
    ctx: &IdentityContext,
    class_id: Uuid,
) -> Result<(), ApiError> {
    let handle = require_store(ctx)?;
    let classes = state.engine.list(handle, Collection::Classes).await?;
    if classes.iter().any(|row| row.id == class_id) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Unknown classId: {}",
            class_id
        )))
    }
}
