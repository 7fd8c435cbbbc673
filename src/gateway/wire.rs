//! Wire types and pure parsing for the diary HTTP API.
//!
//! Kept free of I/O so the response handling can be tested without a server.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use serde::{Deserialize, Serialize};

use super::GatewayError;
use crate::{DateKey, DiaryEntry, ImageRecord};

// =============================================================================
// ENDPOINTS
// =============================================================================

#[must_use]
pub fn entry_url(base_url: &str, date: DateKey) -> String {
    format!("{base_url}/api/diary/{date}")
}

#[must_use]
pub fn upload_url(base_url: &str) -> String {
    format!("{base_url}/api/upload_image")
}

#[must_use]
pub fn update_url(base_url: &str) -> String {
    format!("{base_url}/api/update_image")
}

#[must_use]
pub fn delete_url(base_url: &str) -> String {
    format!("{base_url}/api/delete_image")
}

// =============================================================================
// BODIES
// =============================================================================

/// `POST /api/diary/{date}` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveTextRequest<'a> {
    pub content: &'a str,
}

/// `POST /api/delete_image` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteImageRequest<'a> {
    pub filename: &'a str,
}

/// `GET /api/diary/{date}` response.
#[derive(Debug, Deserialize)]
struct EntryResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    images: Option<Vec<ImageRecord>>,
}

/// `POST /api/upload_image` response.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    filename: Option<String>,
}

/// Error payload the server sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse an entry body. Missing `content`/`images` mean an empty day.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] when the body is not an entry object.
pub fn parse_entry(date: DateKey, body: &str) -> Result<DiaryEntry, GatewayError> {
    let raw: EntryResponse = serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(DiaryEntry {
        date,
        content: raw.content.unwrap_or_default(),
        images: raw.images.unwrap_or_default(),
    })
}

/// Parse an upload body into the server-assigned filename.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] when the body has no usable filename.
pub fn parse_upload(body: &str) -> Result<String, GatewayError> {
    let raw: UploadResponse = serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    match raw.filename {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(GatewayError::Decode("upload response has no filename".into())),
    }
}

/// Build the error for a non-success response, preferring the server's own message.
#[must_use]
pub fn server_error(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default_status_message(status));
    GatewayError::Server { status, message }
}

fn default_status_message(status: u16) -> String {
    match status {
        400 => "bad request".into(),
        401 => "not authenticated".into(),
        403 => "forbidden".into(),
        404 => "not found".into(),
        413 => "file too large".into(),
        500..=599 => "server unavailable".into(),
        other => format!("unexpected status {other}"),
    }
}

#[must_use]
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
