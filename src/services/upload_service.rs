//! UploadService — validation and key composition for image uploads, with
//! all storage delegated to the shared [`BlobContainer`] handle.
//!
//! Each request is stateless; the container handle is the only thing shared
//! across requests and it is never consulted before a write (uploads
//! overwrite same-keyed objects without a duplicate check).

use crate::models::blob::Blob;
use crate::services::container::{BlobContainer, StoreError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Hard cap on an uploaded payload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Fallback object name when sanitizing leaves nothing usable.
const FALLBACK_FILENAME: &str = "unnamed";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided")]
    MissingFile,
    #[error("Only image uploads allowed")]
    NotAnImage,
    #[error("File too large (max 10MB)")]
    TooLarge,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl UploadError {
    /// Client-caused failures map to HTTP 400; store failures to 500.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Store(_))
    }
}

#[derive(Clone)]
pub struct UploadService {
    container: Arc<dyn BlobContainer>,
}

impl UploadService {
    pub fn new(container: Arc<dyn BlobContainer>) -> Self {
        Self { container }
    }

    /// Validate an upload and write it to the container.
    ///
    /// Checks run in a fixed order: declared MIME type first, then size, so a
    /// payload that is both oversized and not an image reports the type
    /// error. The stored key is `{UTC second}-{sanitized filename}`; a second
    /// upload of the same filename within the same second overwrites the
    /// first.
    pub async fn store_image(
        &self,
        filename: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<Blob, UploadError> {
        let content_type = match content_type {
            Some(ct) if ct.starts_with("image/") => ct,
            _ => return Err(UploadError::NotAnImage),
        };
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }

        let name = blob_name(Utc::now(), filename);
        let size = data.len();
        self.container.put_blob(&name, content_type, data).await?;
        info!(%name, size, content_type, "stored upload");

        Ok(Blob {
            url: self.container.blob_url(&name),
            name,
        })
    }

    /// Public URLs of every blob currently in the container.
    ///
    /// Recomputed from the store on every call; order is whatever the store
    /// enumerates, and the response grows with container population.
    pub async fn gallery(&self) -> Result<Vec<String>, StoreError> {
        let names = self.container.list_blob_names().await?;
        Ok(names
            .iter()
            .map(|name| self.container.blob_url(name))
            .collect())
    }
}

/// Compose the object key for an upload received at `now`.
pub fn blob_name(now: DateTime<Utc>, filename: &str) -> String {
    format!("{}-{}", now.format("%Y%m%dT%H%M%S"), sanitize_filename(filename))
}

/// Reduce an untrusted filename to a safe basename.
///
/// Path separators and whitespace become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, and leading/trailing `.`, `_`, `-` are
/// trimmed so traversal sequences cannot survive into the object key.
pub fn sanitize_filename(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            out.push(c);
        } else if c == '/' || c == '\\' || c.is_whitespace() {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| matches!(c, '.' | '_' | '-'));
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
