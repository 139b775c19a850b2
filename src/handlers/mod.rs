pub mod articles;
pub mod auth;
pub mod health;
pub mod members;
pub mod robots;
pub mod tasks;

use crate::database::Database;
use crate::error::ApiError;
use crate::storage::AttachmentStore;

/// Shared application state, constructed once in `main` and injected into
/// every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub store: AttachmentStore,
}

/// A file part lifted out of a multipart request body.
pub(crate) struct UploadedFile {
    pub name: String,
    pub bytes: axum::body::Bytes,
}

/// Empty and whitespace-only form values count as absent.
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse an optional integer form value; empty counts as absent.
pub(crate) fn parse_int_field(name: &str, value: String) -> Result<Option<i32>, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ApiError::bad_request(format!("{} must be a number", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_form_values_are_absent() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }

    #[test]
    fn int_fields_parse_or_reject() {
        assert_eq!(parse_int_field("year", "".to_string()).unwrap(), None);
        assert_eq!(parse_int_field("year", "2025".to_string()).unwrap(), Some(2025));
        assert!(parse_int_field("year", "twenty".to_string()).is_err());
    }
}
