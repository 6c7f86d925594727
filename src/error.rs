// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// API error taxonomy with appropriate status codes and client-friendly messages.
///
/// Every failure surfaced to a caller goes through this enum; internal detail
/// is logged server-side and never placed in the response body.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    UnknownAction(String),

    // 401 Unauthorized
    InvalidAssertion(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 423 Locked - distinct from Forbidden so clients can prompt for the PIN
    SessionLocked(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable - retryable by the caller
    StoreUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::UnknownAction(_) => 400,
            ApiError::InvalidAssertion(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::SessionLocked(_) => 423,
            ApiError::InternalServerError(_) => 500,
            ApiError::StoreUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::UnknownAction(msg)
            | ApiError::InvalidAssertion(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::SessionLocked(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::StoreUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::UnknownAction(_) => "UNKNOWN_ACTION",
            ApiError::InvalidAssertion(_) => "INVALID_ASSERTION",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::SessionLocked(_) => "SESSION_LOCKED",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Convert to the `{success:false, error, code}` envelope body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code(),
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unknown_action(message: impl Into<String>) -> Self {
        ApiError::UnknownAction(message.into())
    }

    pub fn invalid_assertion(message: impl Into<String>) -> Self {
        ApiError::InvalidAssertion(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn session_locked(message: impl Into<String>) -> Self {
        ApiError::SessionLocked(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        ApiError::StoreUnavailable(message.into())
    }
}

// Convert leaf component errors to ApiError
impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound { collection, id } => {
                ApiError::not_found(format!("No {} record with id {}", collection, id))
            }
            crate::store::StoreError::Unavailable(_) => {
                ApiError::store_unavailable("Tenant data store temporarily unavailable")
            }
        }
    }
}

impl From<crate::registry::RegistryError> for ApiError {
    fn from(err: crate::registry::RegistryError) -> Self {
        match err {
            crate::registry::RegistryError::AdminEmailTaken(email) => {
                ApiError::bad_request(format!("Admin email already registered: {}", email))
            }
            crate::registry::RegistryError::InvalidName(msg) => ApiError::bad_request(msg),
            crate::registry::RegistryError::Store(store_err) => store_err.into(),
            crate::registry::RegistryError::PinHash(e) => {
                // Log the real error but return a generic message
                tracing::error!("PIN hashing error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
