//! Knowledge-base article routes. Listing and reads are public; mutation
//! requires a token, and update/delete additionally require the author or an
//! administrator.

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{non_empty, parse_int_field, AppState, UploadedFile};
use crate::auth::PrivilegeLevel;
use crate::database::models::article::{Article, ArticleType};
use crate::database::{ArticleFilter, ArticleUpdate};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::storage::AttachmentKind;

/// GET /api/articles
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ArticleFilter>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.db.list_articles(&filter).await?;
    Ok(Json(articles))
}

/// GET /api/articles/:id
///
/// The view counter bumps before the read, as its own statement; a failed
/// read does not undo the bump.
pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Article>, ApiError> {
    state.db.increment_article_views(id).await?;

    let article = state
        .db
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    Ok(Json(article))
}

/// POST /api/articles (JSON, or multipart with an optional `file` part)
pub async fn create_article(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    req: Request,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let (fields, upload) = parse_article_request(req).await?;

    let title = fields
        .title
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Title is required"))?;
    let article_type = fields.r#type.as_deref().unwrap_or("documentation");
    article_type
        .parse::<ArticleType>()
        .map_err(|_| ApiError::bad_request("Invalid article type"))?;

    let file_path = match upload {
        Some(file) => Some(
            state
                .store
                .put(AttachmentKind::Articles, &file.name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let article_id = state
        .db
        .insert_article(
            title,
            fields.content.as_deref(),
            user.member_id,
            article_type,
            fields.category.as_deref(),
            fields.competition_year,
            file_path.as_deref(),
        )
        .await?;

    let article = state
        .db
        .get_article(article_id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load created article"))?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /api/articles/:id (author or admin)
pub async fn update_article(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    req: Request,
) -> Result<Json<Article>, ApiError> {
    let existing = state
        .db
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    authorize_article_mutation(&existing, &user)?;

    let (fields, upload) = parse_article_request(req).await?;
    if let Some(ref article_type) = fields.r#type {
        article_type
            .parse::<ArticleType>()
            .map_err(|_| ApiError::bad_request("Invalid article type"))?;
    }

    // A replacement upload takes the path slot; the previous blob stays on
    // disk until the article itself is deleted.
    let new_file_path = match upload {
        Some(file) => Some(
            state
                .store
                .put(AttachmentKind::Articles, &file.name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let article = state
        .db
        .update_article(id, fields, new_file_path.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    Ok(Json(article))
}

/// DELETE /api/articles/:id (author or admin)
pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let existing = state
        .db
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    authorize_article_mutation(&existing, &user)?;

    let file_path = state
        .db
        .delete_article(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    // The row is gone; a leftover blob is only worth a warning.
    if let Some(path) = file_path {
        if let Err(e) = state.store.delete(&path).await {
            tracing::warn!("Failed to remove attachment {}: {}", path, e);
        }
    }

    Ok(Json(json!({ "message": "Article deleted successfully" })))
}

/// Authors may mutate their own articles; everyone else needs admin.
fn authorize_article_mutation(article: &Article, user: &AuthUser) -> Result<(), ApiError> {
    if article.author_id == Some(user.member_id) {
        return Ok(());
    }
    user.require(PrivilegeLevel::Admin)
}

/// Accept either a JSON body or a multipart form with an optional `file`
/// part carrying the attachment.
async fn parse_article_request(
    req: Request,
) -> Result<(ArticleUpdate, Option<UploadedFile>), ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if !is_multipart {
        let Json(fields) = Json::<ArticleUpdate>::from_request(req, &())
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;
        return Ok((fields, None));
    }

    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;

    let mut fields = ArticleUpdate::default();
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
            "title" => fields.title = non_empty(read_text(field).await?),
            "content" => fields.content = non_empty(read_text(field).await?),
            "type" => fields.r#type = non_empty(read_text(field).await?),
            "category" => fields.category = non_empty(read_text(field).await?),
            "competition_year" => {
                fields.competition_year = parse_int_field(&name, read_text(field).await?)?
            }
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
