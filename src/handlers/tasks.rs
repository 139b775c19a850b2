//! Task CRUD. Any authenticated member may create, update, or delete tasks.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;
use crate::database::models::task::{Task, TaskPriority, TaskStatus};
use crate::database::{TaskFilter, TaskUpdate};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<i32>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<String>,
}

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.db.list_tasks(&filter).await?;
    Ok(Json(tasks))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let title = payload
        .title
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let priority = payload.priority.as_deref().unwrap_or("medium");
    priority
        .parse::<TaskPriority>()
        .map_err(|_| ApiError::bad_request("Invalid priority"))?;

    let task_id = state
        .db
        .insert_task(
            title,
            payload.description.as_deref(),
            payload.assigned_to,
            user.member_id,
            payload.deadline,
            priority,
        )
        .await?;

    let task = state
        .db
        .get_task(task_id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load created task"))?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/:id
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    if let Some(ref status) = update.status {
        status
            .parse::<TaskStatus>()
            .map_err(|_| ApiError::bad_request("Invalid status"))?;
    }
    if let Some(ref priority) = update.priority {
        priority
            .parse::<TaskPriority>()
            .map_err(|_| ApiError::bad_request("Invalid priority"))?;
    }

    let task = state
        .db
        .update_task(id, update)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(task))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    if !state.db.delete_task(id).await? {
        return Err(ApiError::not_found("Task not found"));
    }
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
