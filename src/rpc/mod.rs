// Single RPC-style entry point. Every inbound call carries an identity
// assertion, an action name, a payload, and optionally a PIN; every outcome
// leaves as a `{success, data?/error}` envelope. Nothing here panics across
// a request.

pub mod action;
pub mod dispatch;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, resolver};
use crate::error::ApiError;
use crate::state::AppState;

pub use action::Action;
pub use dispatch::dispatch;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRequest {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
    pub auth_token: String,
    #[serde(default)]
    pub pin: Option<String>,
}

/// POST /api/rpc
pub async fn handle(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let request: RpcRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            return ApiError::bad_request(format!("Invalid request envelope: {}", e))
                .into_response()
        }
    };

    let action_name = request.action.clone();
    match process(&state, request).await {
        Ok(data) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": data })),
        )
            .into_response(),
        Err(err) => {
            tracing::debug!(action = %action_name, code = err.error_code(), "request failed");
            err.into_response()
        }
    }
}

/// Verify the assertion, resolve role and tenant, then route the action.
async fn process(state: &AppState, request: RpcRequest) -> Result<Value, ApiError> {
    let identity = auth::verify_assertion(&request.auth_token, &state.config.security)?;
    let ctx = resolver::resolve(
        &identity,
        &state.config.security.super_admin_email,
        &state.registry,
    );

    let action = Action::parse(&request.action)?;
    tracing::info!(action = action.as_str(), role = %ctx.role, "rpc");

    dispatch(state, &ctx, action, request.payload, request.pin.as_deref()).await
}
