// Action Router - permission check, session-guard gate, exhaustive dispatch.

use serde_json::Value;

use crate::auth::resolver::IdentityContext;
use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

use super::action::Action;

/// Dispatch one permitted action to its handler.
///
/// The permission table is consulted first; sensitive actions then pass the
/// session-guard gate (already unlocked, or a fresh PIN supplied with the
/// request) before the handler runs.
pub async fn dispatch(
    state: &AppState,
    ctx: &IdentityContext,
    action: Action,
    payload: Value,
    pin: Option<&str>,
) -> Result<Value, ApiError> {
    if !action.permitted_for(ctx.role) {
        tracing::warn!(
            action = action.as_str(),
            role = %ctx.role,
            "action not permitted"
        );
        return Err(ApiError::forbidden(format!(
            "Action not permitted for role {}",
            ctx.role
        )));
    }

    if action.is_sensitive() {
        ensure_unlocked(state, ctx, pin)?;
    }

    match action {
        Action::GetAllTenants => handlers::tenants::get_all(state),
        Action::CreateTenant => handlers::tenants::create(state, payload).await,
        Action::VerifyPin => handlers::identity::verify_pin(state, ctx, pin),
        Action::LockSession => handlers::identity::lock_session(state, ctx),
        Action::VerifyAuth => handlers::identity::verify_auth(ctx),
        Action::GetInstitutionAnalytics => handlers::analytics::institution_summary(state, ctx).await,
        Action::GetTeachers => handlers::teachers::get_all(state, ctx).await,
        Action::CreateTeacher => handlers::teachers::create(state, ctx, payload).await,
        Action::UpdateTeacher => handlers::teachers::update(state, ctx, payload).await,
        Action::DeleteTeacher => handlers::teachers::delete(state, ctx, payload).await,
        Action::GetAllStudents => handlers::students::get_all(state, ctx).await,
        Action::CreateStudent => handlers::students::create(state, ctx, payload).await,
        Action::UpdateStudent => handlers::students::update(state, ctx, payload).await,
        Action::DeleteStudent => handlers::students::delete(state, ctx, payload).await,
        Action::GetClasses => handlers::classes::get_all(state, ctx).await,
        Action::GetTeacherClasses => handlers::classes::for_caller(state, ctx).await,
        Action::GetStudentsByClass => handlers::students::by_class(state, ctx, payload).await,
        Action::MarkAttendance => handlers::attendance::mark(state, ctx, payload).await,
    }
}

/// Session-guard gate for sensitive admin actions. Passes when the caller's
/// elevation is live, or when the request carries a PIN that verifies (which
/// unlocks the session as a side effect).
fn ensure_unlocked(
    state: &AppState,
    ctx: &IdentityContext,
    pin: Option<&str>,
) -> Result<(), ApiError> {
    let tenant_id = ctx
        .tenant_id
        .ok_or_else(|| ApiError::forbidden("No tenant context for this caller"))?;

    if state.sessions.is_unlocked(tenant_id, &ctx.email) {
        return Ok(());
    }

    if let (Some(pin), Some(tenant)) = (pin, state.registry.find_by_id(tenant_id)) {
        if state
            .sessions
            .check_pin(tenant_id, &ctx.email, pin, &tenant.pin_hash)
        {
            return Ok(());
        }
    }

    Err(ApiError::session_locked("Session locked. Verify PIN."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    use crate::config::AppConfig;
    use crate::registry::Tenant;
    use crate::store::Collection;
    use crate::types::Role;

    fn test_state() -> AppState {
        let mut config = AppConfig::development();
        config.security.super_admin_email = "root@platform.test".to_string();
        AppState::new(config)
    }

    async fn provision(state: &AppState, name: &str, admin_email: &str) -> Tenant {
        state
            .registry
            .create_tenant(
                name,
                admin_email,
                "basic",
                state.engine.as_ref(),
                &state.config.security.default_admin_pin,
                state.config.security.bcrypt_cost,
            )
            .await
            .unwrap()
    }

    fn admin_ctx(tenant: &Tenant) -> IdentityContext {
        IdentityContext {
            email: tenant.admin_email.clone(),
            display_name: "Admin".to_string(),
            role: Role::InstitutionAdmin,
            tenant_id: Some(tenant.tenant_id),
            store: Some(tenant.store_handle),
        }
    }

    fn teacher_ctx(tenant: &Tenant, email: &str) -> IdentityContext {
        IdentityContext {
            email: email.to_string(),
            display_name: "Teacher".to_string(),
            role: Role::Teacher,
            tenant_id: Some(tenant.tenant_id),
            store: Some(tenant.store_handle),
        }
    }

    fn guest_ctx() -> IdentityContext {
        IdentityContext {
            email: "nobody@nowhere.test".to_string(),
            display_name: String::new(),
            role: Role::Guest,
            tenant_id: None,
            store: None,
        }
    }

    fn super_ctx() -> IdentityContext {
        IdentityContext {
            email: "root@platform.test".to_string(),
            display_name: "Root".to_string(),
            role: Role::SuperAdmin,
            tenant_id: None,
            store: None,
        }
    }

    #[tokio::test]
    async fn every_non_permitted_pair_is_forbidden() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let contexts = [
            super_ctx(),
            admin_ctx(&tenant),
            teacher_ctx(&tenant, "t@acme.test"),
            guest_ctx(),
        ];

        for ctx in &contexts {
            for action in Action::ALL {
                if action.permitted_for(ctx.role) {
                    continue;
                }
                let err = dispatch(&state, ctx, action, json!({}), None)
                    .await
                    .unwrap_err();
                assert!(
                    matches!(err, ApiError::Forbidden(_)),
                    "{} for {} should be forbidden",
                    action.as_str(),
                    ctx.role
                );
            }
        }
    }

    #[tokio::test]
    async fn admin_without_pin_is_locked_on_every_sensitive_action() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let ctx = admin_ctx(&tenant);

        for action in Action::ALL.into_iter().filter(Action::is_sensitive) {
            let err = dispatch(&state, &ctx, action, json!({}), None)
                .await
                .unwrap_err();
            assert!(
                matches!(err, ApiError::SessionLocked(_)),
                "{} should be locked",
                action.as_str()
            );
        }
    }

    #[tokio::test]
    async fn wrong_pin_does_not_unlock() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let ctx = admin_ctx(&tenant);

        let data = dispatch(&state, &ctx, Action::VerifyPin, json!({}), Some("000000"))
            .await
            .unwrap();
        assert_eq!(data["unlocked"], false);

        let err = dispatch(&state, &ctx, Action::GetTeachers, json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SessionLocked(_)));
    }

    #[tokio::test]
    async fn verify_pin_unlocks_only_its_own_tenant() {
        let state = test_state();
        let acme = provision(&state, "Acme", "admin@acme.test").await;
        let globex = provision(&state, "Globex", "admin@globex.test").await;

        let data = dispatch(
            &state,
            &admin_ctx(&acme),
            Action::VerifyPin,
            json!({}),
            Some("123456"),
        )
        .await
        .unwrap();
        assert_eq!(data["unlocked"], true);

        let data = dispatch(&state, &admin_ctx(&acme), Action::GetTeachers, json!({}), None)
            .await
            .unwrap();
        assert_eq!(data, json!([]));

        // The other tenant's admin stays locked
        let err = dispatch(&state, &admin_ctx(&globex), Action::GetTeachers, json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SessionLocked(_)));
    }

    #[tokio::test]
    async fn fresh_pin_on_a_sensitive_action_passes_the_gate() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let ctx = admin_ctx(&tenant);

        let data = dispatch(&state, &ctx, Action::GetClasses, json!({}), Some("123456"))
            .await
            .unwrap();
        assert_eq!(data.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn lock_session_relocks_the_admin() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let ctx = admin_ctx(&tenant);

        dispatch(&state, &ctx, Action::VerifyPin, json!({}), Some("123456"))
            .await
            .unwrap();
        dispatch(&state, &ctx, Action::LockSession, json!({}), None)
            .await
            .unwrap();

        let err = dispatch(&state, &ctx, Action::GetTeachers, json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SessionLocked(_)));
    }

    #[tokio::test]
    async fn teacher_crud_maintains_the_global_teacher_index() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let ctx = admin_ctx(&tenant);

        let created = dispatch(
            &state,
            &ctx,
            Action::CreateTeacher,
            json!({"name": "A", "email": "a@acme.test", "classes": []}),
            Some("123456"),
        )
        .await
        .unwrap();
        let teacher_id = created["teacherId"].as_str().unwrap().to_string();

        let resolved = state.registry.find_by_teacher_email("a@acme.test").unwrap();
        assert_eq!(resolved.tenant_id, tenant.tenant_id);

        dispatch(
            &state,
            &ctx,
            Action::DeleteTeacher,
            json!({"teacherId": teacher_id}),
            None,
        )
        .await
        .unwrap();
        assert!(state.registry.find_by_teacher_email("a@acme.test").is_none());
    }

    #[tokio::test]
    async fn update_on_missing_teacher_is_not_found_and_changes_nothing() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let ctx = admin_ctx(&tenant);

        dispatch(
            &state,
            &ctx,
            Action::CreateTeacher,
            json!({"name": "A", "email": "a@acme.test"}),
            Some("123456"),
        )
        .await
        .unwrap();

        let before = dispatch(&state, &ctx, Action::GetTeachers, json!({}), None)
            .await
            .unwrap();
        let err = dispatch(
            &state,
            &ctx,
            Action::UpdateTeacher,
            json!({"teacherId": Uuid::new_v4(), "name": "X", "email": "x@acme.test"}),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let after = dispatch(&state, &ctx, Action::GetTeachers, json!({}), None)
            .await
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn student_create_rejects_a_dangling_class_id() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let ctx = admin_ctx(&tenant);

        let err = dispatch(
            &state,
            &ctx,
            Action::CreateStudent,
            json!({"name": "S", "rollNo": "7", "classId": Uuid::new_v4()}),
            Some("123456"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn mark_attendance_writes_one_batch_with_a_shared_timestamp() {
        let state = test_state();
        let tenant = provision(&state, "Acme", "admin@acme.test").await;
        let teacher = teacher_ctx(&tenant, "t@acme.test");

        let classes = state
            .engine
            .list(tenant.store_handle, Collection::Classes)
            .await
            .unwrap();
        let class_id = classes[0].id;

        let data = dispatch(
            &state,
            &teacher,
            Action::MarkAttendance,
            json!({
                "classId": class_id,
                "date": "2026-03-02",
                "records": [
                    {"studentId": Uuid::new_v4(), "status": "PRESENT"},
                    {"studentId": Uuid::new_v4(), "status": "ABSENT"},
                    {"studentId": Uuid::new_v4(), "status": "LATE"},
                ]
            }),
            None,
        )
        .await
        .unwrap();
        assert_eq!(data["recorded"], 3);

        let rows = state
            .engine
            .list(tenant.store_handle, Collection::Attendance)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);

        let mut ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);

        let timestamps: Vec<&Value> = rows.iter().map(|r| &r.fields["timestamp"]).collect();
        assert!(timestamps.iter().all(|t| *t == timestamps[0]));
        assert!(rows
            .iter()
            .all(|r| r.fields["recordedBy"] == "t@acme.test"));
    }
}
