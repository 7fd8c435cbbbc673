//! `reqwest` implementation of [`DiaryApi`].
//!
//! Thin HTTP wrapper: build the request, read status and body, and hand the
//! body to the pure parsers in [`super::wire`].

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use super::wire::{self, DeleteImageRequest, SaveTextRequest};
use super::{DiaryApi, GatewayError, ImageUpload};
use crate::config::ClientConfig;
use crate::{DateKey, DiaryEntry, ImageRecord, ImageUpdate};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway from client config (origin, timeouts, session cookie).
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| GatewayError::ClientBuild(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| GatewayError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl DiaryApi for HttpGateway {
    async fn fetch_entry(&self, date: DateKey) -> Result<DiaryEntry, GatewayError> {
        let (status, body) = self.send(self.http.get(wire::entry_url(&self.base_url, date))).await?;
        if status == 404 {
            debug!(%date, "no entry stored for date");
            return Ok(DiaryEntry::empty(date));
        }
        if !wire::is_success(status) {
            warn!(%date, status, "fetch entry rejected");
            return Err(wire::server_error(status, &body));
        }
        wire::parse_entry(date, &body)
    }

    async fn save_text(&self, date: DateKey, content: &str) -> Result<(), GatewayError> {
        let request = self
            .http
            .post(wire::entry_url(&self.base_url, date))
            .json(&SaveTextRequest { content });
        let (status, body) = self.send(request).await?;
        if !wire::is_success(status) {
            warn!(%date, status, "save text rejected");
            return Err(wire::server_error(status, &body));
        }
        debug!(%date, chars = content.chars().count(), "entry text saved");
        Ok(())
    }

    async fn upload_image(
        &self,
        date: DateKey,
        upload: ImageUpload,
        caption: &str,
    ) -> Result<ImageRecord, GatewayError> {
        upload.validate()?;
        let size = upload.bytes.len();
        let form = Form::new()
            .part("image", Part::bytes(upload.bytes).file_name(upload.file_name))
            .text("date", date.to_string())
            .text("caption", caption.to_owned());
        let (status, body) = self.send(self.http.post(wire::upload_url(&self.base_url)).multipart(form)).await?;
        if !wire::is_success(status) {
            warn!(%date, status, "upload rejected");
            return Err(wire::server_error(status, &body));
        }
        let filename = wire::parse_upload(&body)?;
        debug!(%date, %filename, size, "image uploaded");
        Ok(ImageRecord::uploaded(filename, caption))
    }

    async fn update_image(&self, update: &ImageUpdate) -> Result<(), GatewayError> {
        let (status, body) = self.send(self.http.post(wire::update_url(&self.base_url)).json(update)).await?;
        if status == 404 {
            return Err(GatewayError::NotFound);
        }
        if !wire::is_success(status) {
            warn!(filename = %update.filename, status, "image update rejected");
            return Err(wire::server_error(status, &body));
        }
        Ok(())
    }

    async fn delete_image(&self, filename: &str) -> Result<(), GatewayError> {
        let request = self
            .http
            .post(wire::delete_url(&self.base_url))
            .json(&DeleteImageRequest { filename });
        let (status, body) = self.send(request).await?;
        if status == 404 {
            debug!(%filename, "image already deleted");
            return Ok(());
        }
        if !wire::is_success(status) {
            warn!(%filename, status, "image delete rejected");
            return Err(wire::server_error(status, &body));
        }
        Ok(())
    }
}
