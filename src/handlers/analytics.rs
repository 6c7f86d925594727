// Institution analytics, aggregated from the tenant's own collections.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use crate::types::AttendanceStatus;

use super::attendance::AttendanceFields;
use super::{encode_fields, require_store};

/// How many recent days of per-day rates the summary carries.
const RATE_WINDOW_DAYS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsSummary {
    total_students: usize,
    total_teachers: usize,
    total_classes: usize,
    /// Percentage of records marked PRESENT across all attendance.
    average_attendance: u32,
    dates: Vec<NaiveDate>,
    attendance_rates: Vec<u32>,
}

/// getInstitutionAnalytics
pub async fn institution_summary(
    state: &AppState,
    ctx: &IdentityContext,
) -> Result<Value, ApiError> {
    let handle = require_store(ctx)?;

    let total_students = state.engine.list(handle, Collection::Students).await?.len();
    let total_teachers = state.engine.list(handle, Collection::Teachers).await?.len();
    let total_classes = state.engine.list(handle, Collection::Classes).await?.len();

    let attendance = state.engine.list(handle, Collection::Attendance).await?;
    let mut present_total = 0usize;
    let mut daily: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();

    for row in &attendance {
        let record: AttendanceFields = match serde_json::from_value(row.fields.clone()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(record_id = %row.id, "skipping unreadable attendance record: {}", e);
                continue;
            }
        };
        let entry = daily.entry(record.date).or_insert((0, 0));
        entry.1 += 1;
        if record.status == AttendanceStatus::Present {
            entry.0 += 1;
            present_total += 1;
        }
    }

    let counted: usize = daily.values().map(|(_, total)| total).sum();
    let average_attendance = percentage(present_total, counted);

    // Most recent days, oldest first
    let recent: Vec<(NaiveDate, (usize, usize))> = daily
        .into_iter()
        .rev()
        .take(RATE_WINDOW_DAYS)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let dates: Vec<NaiveDate> = recent.iter().map(|(date, _)| *date).collect();
    let attendance_rates: Vec<u32> = recent
        .iter()
        .map(|(_, (present, total))| percentage(*present, *total))
        .collect();

    encode_fields(&AnalyticsSummary {
        total_students,
        total_teachers,
        total_classes,
        average_attendance,
        dates,
        attendance_rates,
    })
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part * 100) / whole) as u32
    }
}
