//! Export client — the single point of entry for the external render
//! service.
//!
//! The core never produces the binary document itself: it hands the export
//! path one unpaginated content unit and receives the finished payload
//! back. No other module may talk to the render service directly.

use bytes::Bytes;
use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::PageContent;

const RENDER_PATH: &str = "/v1/render";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("render service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("render service returned an empty payload")]
    EmptyPayload,
}

/// Client for the external fixed-format renderer.
#[derive(Clone)]
pub struct ExportClient {
    client: Client,
    base_url: String,
}

impl ExportClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends the single-unit export projection and returns the rendered
    /// binary document.
    pub async fn render_pdf(&self, unit: &PageContent) -> Result<Bytes, ExportError> {
        let url = format!("{}{}", self.base_url, RENDER_PATH);
        let response = self.client.post(&url).json(unit).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload = response.bytes().await?;
        if payload.is_empty() {
            return Err(ExportError::EmptyPayload);
        }
        debug!(bytes = payload.len(), "render service returned payload");
        Ok(payload)
    }
}

/// Stores a rendered export payload and returns its storage key.
pub async fn store_export(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    user_id: Uuid,
    payload: Bytes,
) -> Result<String, AppError> {
    let key = format!(
        "exports/{}/cv-{}.pdf",
        user_id,
        Utc::now().format("%Y%m%dT%H%M%S")
    );
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .content_type("application/pdf")
        .body(aws_sdk_s3::primitives::ByteStream::from(payload.to_vec()))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Failed to store export payload: {e}")))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ExportClient::new("http://renderer:9090/".to_string());
        assert_eq!(client.base_url, "http://renderer:9090");
    }

    #[test]
    fn test_export_errors_format() {
        let err = ExportError::Api {
            status: 503,
            message: "warming up".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("warming up"));
    }
}
