//! Registration and login.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::auth::{self, Claims};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub join_year: Option<i32>,
    pub graduation_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/members/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = payload
        .name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Name is required"))?;
    let email = payload
        .email
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;
    let password = payload
        .password
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;

    let password_hash = auth::hash_password(password)?;

    let member = state
        .db
        .insert_member(
            name,
            email,
            &password_hash,
            payload.role.as_deref(),
            payload.join_year,
            payload.graduation_year,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Member registered successfully",
            "member": member,
        })),
    ))
}

/// POST /api/members/login
///
/// Unknown email and wrong password produce the same response, so the
/// endpoint cannot be used to probe which addresses are registered.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = payload
        .email
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Email is required"))?;
    let password = payload
        .password
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;

    let member = state
        .db
        .find_member_by_email(email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !auth::verify_password(password, &member.password)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let claims = Claims::new(
        member.member_id,
        member.email.clone(),
        member.privilege_level.clone(),
    );
    let token = auth::generate_jwt(claims)?;

    Ok(Json(json!({
        "token": token,
        "member": {
            "member_id": member.member_id,
            "name": member.name,
            "email": member.email,
            "role": member.role,
            "privilege_level": member.privilege_level,
        },
    })))
}
