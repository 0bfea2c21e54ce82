//! Raw object access: the [`ObjectStore`] trait and its S3 implementation.

use async_trait::async_trait;
use aws_sdk_s3::{error::ProvideErrorMetadata, primitives::ByteStream};
use bytes::Bytes;
use thiserror::Error;

/// Errors produced by an [`ObjectStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The bucket or the object does not exist.
    #[error("object not found")]
    NotFound,

    /// A conditional write lost against a concurrent writer.
    #[error("object was modified since it was read")]
    PreconditionFailed,

    /// The object store rejected or failed the request.
    #[error("object store request failed: {0}")]
    Backend(String),
}

/// An object body together with its entity tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub etag: Option<String>,
}

/// Minimal object store interface used by [`super::DocumentStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata probe; succeeds only if the object exists.
    async fn head(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    /// Fetch the full object body.
    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError>;

    /// Write `body` as `application/json`, replacing the object.
    ///
    /// When `if_match` is set the write only succeeds if the stored object
    /// still carries that ETag. Returns the new ETag when the store confirms
    /// the write.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        if_match: Option<String>,
    ) -> Result<Option<String>, StoreError>;
}

/// [`ObjectStore`] backed by AWS S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                    StoreError::NotFound
                } else {
                    backend_error(&e)
                }
            })?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StoreError::NotFound
                } else {
                    backend_error(&e)
                }
            })?;

        let etag = output.e_tag().map(str::to_owned);
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(format!("failed to read object body: {e}")))?
            .into_bytes();

        Ok(StoredObject { body, etag })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        if_match: Option<String>,
    ) -> Result<Option<String>, StoreError> {
        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .set_if_match(if_match)
            .send()
            .await
            .map_err(|e| match e.code() {
                Some("PreconditionFailed" | "ConditionalRequestConflict") => {
                    StoreError::PreconditionFailed
                }
                Some("NoSuchKey" | "NoSuchBucket") => StoreError::NotFound,
                _ => backend_error(&e),
            })?;

        Ok(output.e_tag().map(str::to_owned))
    }
}

fn backend_error<E>(err: &E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::Backend(aws_sdk_s3::error::DisplayErrorContext(err).to_string())
}
