//! Robot project archive routes. Listing and reads are public; any
//! authenticated member may create, update, or delete entries.

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{non_empty, parse_int_field, AppState, UploadedFile};
use crate::database::models::Robot;
use crate::database::{RobotFilter, RobotUpdate};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::storage::AttachmentKind;

/// GET /api/robots
pub async fn list_robots(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RobotFilter>,
) -> Result<Json<Vec<Robot>>, ApiError> {
    let robots = state.db.list_robots(&filter).await?;
    Ok(Json(robots))
}

/// GET /api/robots/:id
pub async fn get_robot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Robot>, ApiError> {
    let robot = state
        .db
        .get_robot(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Robot not found"))?;
    Ok(Json(robot))
}

/// POST /api/robots (JSON, or multipart with an optional `file` part)
pub async fn create_robot(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    req: Request,
) -> Result<(StatusCode, Json<Robot>), ApiError> {
    let (fields, upload) = parse_robot_request(req).await?;

    let name = fields
        .name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Name is required"))?;

    let file_path = match upload {
        Some(file) => Some(
            state
                .store
                .put(AttachmentKind::Robots, &file.name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let robot_id = state
        .db
        .insert_robot(
            name,
            fields.competition_year,
            fields.team_lead_id,
            fields.specifications.as_deref(),
            fields.performance_notes.as_deref(),
            fields.final_rank,
            file_path.as_deref(),
        )
        .await?;

    let robot = state
        .db
        .get_robot(robot_id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load created robot"))?;
    Ok((StatusCode::CREATED, Json(robot)))
}

/// PUT /api/robots/:id
pub async fn update_robot(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
    req: Request,
) -> Result<Json<Robot>, ApiError> {
    let (fields, upload) = parse_robot_request(req).await?;

    // A replacement upload takes the path slot; the previous blob stays on
    // disk until the robot itself is deleted.
    let new_file_path = match upload {
        Some(file) => Some(
            state
                .store
                .put(AttachmentKind::Robots, &file.name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let robot = state
        .db
        .update_robot(id, fields, new_file_path.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Robot not found"))?;
    Ok(Json(robot))
}

/// DELETE /api/robots/:id
pub async fn delete_robot(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let file_path = state
        .db
        .delete_robot(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Robot not found"))?;

    // The row is gone; a leftover blob is only worth a warning.
    if let Some(path) = file_path {
        if let Err(e) = state.store.delete(&path).await {
            tracing::warn!("Failed to remove attachment {}: {}", path, e);
        }
    }

    Ok(Json(json!({ "message": "Robot deleted successfully" })))
}

/// Accept either a JSON body or a multipart form with an optional `file`
/// part carrying the attachment.
async fn parse_robot_request(
    req: Request,
) -> Result<(RobotUpdate, Option<UploadedFile>), ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if !is_multipart {
        let Json(fields) = Json::<RobotUpdate>::from_request(req, &())
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;
        return Ok((fields, None));
    }

    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;

    let mut fields = RobotUpdate::default();
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => fields.name = non_empty(read_text(field).await?),
            "competition_year" => {
                fields.competition_year = parse_int_field(&name, read_text(field).await?)?
            }
            "team_lead_id" => fields.team_lead_id = parse_int_field(&name, read_text(field).await?)?,
            "specifications" => fields.specifications = non_empty(read_text(field).await?),
            "performance_notes" => {
                fields.performance_notes = non_empty(read_text(field).await?)
            }
            "final_rank" => fields.final_rank = parse_int_field(&name, read_text(field).await?)?,
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
                upload = Some(UploadedFile {
                    name: file_name,
                    bytes,
                });
            }
            _ => {}
        }
    }
    Ok((fields, upload))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid form field: {}", e)))
}
