//! Shared wire helpers for the backend HTTP clients.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::submission::AttachedFile;

/// The backend's standard failure body.
#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Extracts the backend's `{error}` message from a failure body, falling
/// back to the raw body or the status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|wrapper| wrapper.error)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Backend returned {}", status)
            } else {
                body.trim().to_string()
            }
        })
}

/// Statuses worth retrying as-is (throttling, server-side trouble).
pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Builds a multipart form from the workflow's text fields.
pub(crate) fn form_from_fields(fields: &BTreeMap<String, String>) -> Form {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }
    form
}

/// Builds the file part for an attachment.
pub(crate) fn file_part(file: &AttachedFile) -> Result<Part> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| TailorCvError::internal(format!("Invalid attachment MIME type: {}", e)))
}

/// Lenient RFC 3339 parsing for backend timestamps; an unparseable value is
/// dropped rather than failing the whole payload.
pub(crate) fn parse_timestamp(value: Option<String>) -> Option<chrono::DateTime<chrono::Utc>> {
    value.and_then(|raw| {
        chrono::DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .ok()
    })
}
