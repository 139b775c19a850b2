use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth::{verify_jwt, Claims, PrivilegeLevel};
use crate::error::ApiError;

/// Authenticated caller context extracted from a verified JWT.
///
/// Handlers that require a valid token take this as an extractor argument;
/// extraction fails with 401 when the Authorization header is missing,
/// malformed, expired, or carries a bad signature.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub member_id: i32,
    pub email: String,
    pub privilege_level: PrivilegeLevel,
}

impl AuthUser {
    /// Require at least the given privilege level (standard < leader < admin).
    pub fn require(&self, level: PrivilegeLevel) -> Result<(), ApiError> {
        if self.privilege_level >= level {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient privileges"))
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        let privilege_level = claims
            .privilege_level
            .parse()
            .unwrap_or(PrivilegeLevel::Standard);
        Self {
            member_id: claims.member_id,
            email: claims.email,
            privilege_level,
        }
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;
        let claims = verify_jwt(&token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;
        Ok(AuthUser::from(claims))
    }
}

/// Extract the JWT from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
