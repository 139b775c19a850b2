//! Member listing, lookup, statistics, and admin-only mutation.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::auth::PrivilegeLevel;
use crate::database::models::{MemberStats, MemberSummary};
use crate::database::MemberUpdate;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<MemberSummary>>, ApiError> {
    let members = state.db.list_members().await?;
    Ok(Json(members))
}

/// GET /api/members/:id
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<MemberSummary>, ApiError> {
    let member = state
        .db
        .get_member(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Member not found"))?;
    Ok(Json(member))
}

/// GET /api/members/:id/stats
pub async fn member_stats(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<MemberStats>, ApiError> {
    let stats = state.db.member_stats(id).await?;
    Ok(Json(stats))
}

/// PUT /api/members/:id (admin only)
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(update): Json<MemberUpdate>,
) -> Result<Json<MemberSummary>, ApiError> {
    user.require(PrivilegeLevel::Admin)?;

    if let Some(ref level) = update.privilege_level {
        level
            .parse::<PrivilegeLevel>()
            .map_err(|_| ApiError::bad_request("Invalid privilege level"))?;
    }

    let member = state
        .db
        .update_member(id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Member not found"))?;
    Ok(Json(member))
}

/// DELETE /api/members/:id (admin only)
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    user.require(PrivilegeLevel::Admin)?;

    if !state.db.delete_member(id).await? {
        return Err(ApiError::not_found("Member not found"));
    }
    Ok(Json(json!({ "message": "Member deleted successfully" })))
}
