// Identity verification for inbound assertions.
//
// Callers present a signed JWT issued by the identity provider. Unlike the
// original prototype this layer replaces, the signature and expiry are always
// validated; an assertion that fails either check never reaches the resolver.

pub mod resolver;
pub mod session;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::error::ApiError;

/// Claims carried by an identity assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// The verified identity extracted from a valid assertion.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub email: String,
    pub display_name: String,
    pub picture_url: String,
}

/// Validate an identity assertion and extract the verified identity.
///
/// Fails with `InvalidAssertion` when the token is malformed, expired, or
/// carries a bad signature. The decode error detail is logged, not returned.
pub fn verify_assertion(
    token: &str,
    security: &SecurityConfig,
) -> Result<VerifiedIdentity, ApiError> {
    if security.assertion_secret.is_empty() {
        tracing::error!("assertion secret not configured; rejecting all assertions");
        return Err(ApiError::invalid_assertion("Invalid identity assertion"));
    }

    let decoding_key = DecodingKey::from_secret(security.assertion_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    if let Some(issuer) = &security.assertion_issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<AssertionClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!("assertion rejected: {}", e);
        ApiError::invalid_assertion("Invalid identity assertion")
    })?;

    let claims = token_data.claims;
    if claims.email.trim().is_empty() {
        return Err(ApiError::invalid_assertion("Invalid identity assertion"));
    }

    Ok(VerifiedIdentity {
        email: claims.email,
        display_name: claims.name,
        picture_url: claims.picture,
    })
}
