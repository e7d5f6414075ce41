//! Capability handle for the external blob container.
//!
//! The gateway talks to its object store exclusively through [`BlobContainer`].
//! The handle is constructed once at startup and shared across all requests;
//! handlers receive it as an explicit dependency inside the router state
//! rather than reaching for a global.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("container setup failed: {0}")]
    ContainerSetup(String),
    #[error("store request failed: {0}")]
    Request(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single public-read container in an external object store.
///
/// Writes overwrite silently: putting an existing name replaces the old
/// payload, which is the contract upload-key composition relies on for
/// same-second collisions. Listing must return every key in the container,
/// following the store's own pagination internally.
#[async_trait]
pub trait BlobContainer: Send + Sync {
    /// Public URL a client can fetch the named blob from.
    fn blob_url(&self, name: &str) -> String;

    /// Write (or overwrite) a blob.
    async fn put_blob(&self, name: &str, content_type: &str, data: Bytes) -> StoreResult<()>;

    /// Every object key currently in the container, enumeration order
    /// unspecified.
    async fn list_blob_names(&self) -> StoreResult<Vec<String>>;
}
