//! Document Fetcher: retrieves the raw résumé and turns it into text.
//!
//! Objects are read through a short-lived presigned URL so the same code path
//! works against MinIO locally and S3 in production. PDF decoding is CPU-bound
//! and runs on the blocking pool.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::documents::lifecycle::DocumentLocator;

const PRESIGN_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not presign object URL: {0}")]
    Presign(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("storage returned status {0}")]
    Status(u16),

    #[error("unreadable document: {0}")]
    Unreadable(String),
}

/// Carried in the orchestrator as `Arc<dyn DocumentFetcher>`.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_text(&self, locator: DocumentLocator<'_>) -> Result<String, FetchError>;
}

pub struct S3DocumentFetcher {
    s3: aws_sdk_s3::Client,
    bucket: String,
    http: Client,
}

impl S3DocumentFetcher {
    pub fn new(s3: aws_sdk_s3::Client, bucket: String) -> Self {
        Self {
            s3,
            bucket,
            http: Client::new(),
        }
    }

    async fn presigned_url(&self, key: &str) -> Result<String, FetchError> {
        let presigning = PresigningConfig::expires_in(PRESIGN_TTL)
            .map_err(|e| FetchError::Presign(e.to_string()))?;
        let request = self
            .s3
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| FetchError::Presign(e.to_string()))?;
        Ok(request.uri().to_string())
    }
}

#[async_trait]
impl DocumentFetcher for S3DocumentFetcher {
    async fn fetch_text(&self, locator: DocumentLocator<'_>) -> Result<String, FetchError> {
        let url = self.presigned_url(locator.storage_key).await?;

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        debug!(
            "Fetched s3://{}/{} ({} bytes)",
            self.bucket,
            locator.storage_key,
            bytes.len()
        );

        decode_text(bytes, locator.file_type).await
    }
}

pub fn is_pdf(file_type: &str, bytes: &[u8]) -> bool {
    file_type.to_ascii_lowercase().contains("pdf") || bytes.starts_with(b"%PDF")
}

/// Decodes fetched bytes: PDFs through `pdf-extract`, everything else as UTF-8.
pub async fn decode_text(bytes: Bytes, file_type: &str) -> Result<String, FetchError> {
    if !is_pdf(file_type, &bytes) {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| FetchError::Unreadable(format!("PDF decoding task failed: {e}")))?
        .map_err(|e| FetchError::Unreadable(e.to_string()))
}
