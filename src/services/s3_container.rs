//! S3-compatible implementation of [`BlobContainer`] backed by `aws-sdk-s3`.
//!
//! Path-style addressing is forced so public blob URLs take the shape
//! `{endpoint}/{container}/{name}`, which is what S3-compatible stores such
//! as MinIO serve anonymously once the container carries a public-read
//! policy.

use crate::services::container::{BlobContainer, StoreError, StoreResult};
use async_trait::async_trait;
use aws_sdk_s3::{Client, error::DisplayErrorContext, primitives::ByteStream};
use bytes::Bytes;
use serde_json::json;
use tracing::{debug, info};

pub struct S3Container {
    client: Client,
    container: String,
    base_url: String,
}

impl S3Container {
    /// Wrap an SDK client for one fixed container.
    ///
    /// `endpoint` is the store account endpoint the container is reachable
    /// under; it is only used to compose public URLs, the client carries its
    /// own copy for requests.
    pub fn new(client: Client, endpoint: &str, container: impl Into<String>) -> Self {
        let container = container.into();
        let base_url = format!("{}/{}", endpoint.trim_end_matches('/'), container);
        Self {
            client,
            container,
            base_url,
        }
    }

    /// Create the container if it does not exist yet and mark its blobs
    /// public-read.
    ///
    /// "Already exists" (including already owned by this account) is a normal
    /// startup condition and is ignored; any other creation failure aborts
    /// startup so a misconfigured store is not discovered on first upload.
    pub async fn ensure_container(&self) -> StoreResult<()> {
        match self
            .client
            .create_bucket()
            .bucket(&self.container)
            .send()
            .await
        {
            Ok(_) => {
                info!("created container `{}`", self.container);
                self.apply_public_read_policy().await
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_bucket_already_owned_by_you()
                    || service_err.is_bucket_already_exists()
                {
                    debug!("container `{}` already exists", self.container);
                    Ok(())
                } else {
                    Err(StoreError::ContainerSetup(
                        DisplayErrorContext(&service_err).to_string(),
                    ))
                }
            }
        }
    }

    /// Allow anonymous `GetObject` on every blob in the container.
    async fn apply_public_read_policy(&self) -> StoreResult<()> {
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": {"AWS": ["*"]},
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/*", self.container)],
            }]
        });

        self.client
            .put_bucket_policy()
            .bucket(&self.container)
            .policy(policy.to_string())
            .send()
            .await
            .map_err(|err| {
                StoreError::ContainerSetup(DisplayErrorContext(&err).to_string())
            })?;

        debug!("container `{}` marked public-read", self.container);
        Ok(())
    }
}

#[async_trait]
impl BlobContainer for S3Container {
    fn blob_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn put_blob(&self, name: &str, content_type: &str, data: Bytes) -> StoreResult<()> {
        self.client
            .put_object()
            .bucket(&self.container)
            .key(name)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| StoreError::Request(DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }

    async fn list_blob_names(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        let mut continuation_token: Option<String> = None;

        // Follow the store's pagination so callers always see the full
        // container, whatever its page size.
        loop {
            let mut request = self.client.list_objects_v2().bucket(&self.container);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let page = request
                .send()
                .await
                .map_err(|err| StoreError::Request(DisplayErrorContext(&err).to_string()))?;

            names.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            continuation_token = page.next_continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                break;
            }
        }

        Ok(names)
    }
}
