//! Persistence gateway: the five server operations behind the diary page.
//!
//! DESIGN
//! ======
//! `DiaryApi` is the seam between the session loop and the network. The
//! production implementation is [`http::HttpGateway`]; tests substitute an
//! in-memory fake. Every operation is a single round trip with no retries.
//!
//! ERROR HANDLING
//! ==============
//! Failures come back as [`GatewayError`], never as panics. "Entry not found"
//! is not an error (it is an empty day), and deleting an image that is already
//! gone succeeds, so repeated deletes are harmless.

pub mod http;
pub mod wire;

use async_trait::async_trait;

use crate::{DateKey, DiaryEntry, ImageRecord, ImageUpdate};

pub use http::HttpGateway;

/// Errors produced by gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (connect failure, timeout, reset).
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The addressed image does not exist on the server.
    #[error("not found")]
    NotFound,

    /// The request was rejected before being sent.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The server's response body could not be understood.
    #[error("unreadable response: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl GatewayError {
    /// Stable machine-readable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Server { .. } => "E_SERVER",
            Self::NotFound => "E_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Decode(_) => "E_DECODE",
            Self::ClientBuild(_) => "E_CLIENT_BUILD",
        }
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name as chosen by the user.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), bytes }
    }

    /// Reject uploads with no name or no content.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when the file is unusable.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.file_name.trim().is_empty() {
            return Err(GatewayError::Validation("no file selected".into()));
        }
        if self.bytes.is_empty() {
            return Err(GatewayError::Validation(format!("file `{}` is empty", self.file_name)));
        }
        Ok(())
    }
}

/// Server operations used by the diary page.
#[async_trait]
pub trait DiaryApi: Send + Sync {
    /// Load one day. A day that was never saved comes back empty.
    async fn fetch_entry(&self, date: DateKey) -> Result<DiaryEntry, GatewayError>;

    /// Overwrite the text of one day.
    async fn save_text(&self, date: DateKey, content: &str) -> Result<(), GatewayError>;

    /// Attach a photo to one day; returns it at the default placement.
    async fn upload_image(
        &self,
        date: DateKey,
        upload: ImageUpload,
        caption: &str,
    ) -> Result<ImageRecord, GatewayError>;

    /// Overwrite the stored placement and caption of one image.
    async fn update_image(&self, update: &ImageUpdate) -> Result<(), GatewayError>;

    /// Remove an image and its stored file. Already-deleted images succeed.
    async fn delete_image(&self, filename: &str) -> Result<(), GatewayError>;
}

/// URL of an uploaded image's static file.
#[must_use]
pub fn image_url(base_url: &str, filename: &str) -> String {
    format!("{}/static/uploads/{filename}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
