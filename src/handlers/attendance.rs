// Attendance batch writes. Records are append-only: one batch per
// markAttendance call, all records sharing a single server-assigned
// timestamp, written as a contiguous all-or-nothing block.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use crate::types::AttendanceStatus;

use super::{encode_fields, parse_payload, require_store};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkAttendancePayload {
    class_id: Uuid,
    date: NaiveDate,
    records: Vec<StudentMark>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentMark {
    student_id: Uuid,
    status: AttendanceStatus,
}

/// Stored attendance record fields (the record id is store-assigned).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttendanceFields {
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    pub timestamp: DateTime<Utc>,
    pub recorded_by: String,
}

/// markAttendance
pub async fn mark(
    state: &AppState,
    ctx: &IdentityContext,
    payload: Value,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;
    let p: MarkAttendancePayload = parse_payload(payload)?;
    if p.records.is_empty() {
        return Err(ApiError::bad_request(
            "markAttendance requires at least one record",
        ));
    }

    // One timestamp for the whole batch
    let timestamp = Utc::now();
    let mut rows = Vec::with_capacity(p.records.len());
    for mark in &p.records {
        rows.push(encode_fields(&AttendanceFields {
            class_id: p.class_id,
            date: p.date,
            student_id: mark.student_id,
            status: mark.status,
            timestamp,
            recorded_by: ctx.email.clone(),
        })?);
    }

    let ids = state
        .engine
        .append_batch(handle, Collection::Attendance, rows)
        .await?;

    tracing::info!(
        class_id = %p.class_id,
        count = ids.len(),
        recorded_by = %ctx.email,
        "attendance batch recorded"
    );
    Ok(json!({ "recorded": ids.len() }))
}
