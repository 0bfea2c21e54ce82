//! [`DocumentStore`]: whole-document access to the accounts JSON blob.

use std::sync::Arc;

use bytes::Bytes;
use common::{protocol::AccountsDocument, ServiceError};
use tracing::{error, info, warn};

use super::object::{ObjectStore, StoreError};

const MISSING_DOCUMENT: &str = "Bucket or file doesn't exist";
const EMPTY_DOCUMENT: &str = "Data not found or failed to download from AWS S3";
const UNCONFIRMED_UPLOAD: &str = "Failed to upload data to AWS S3";
const CONCURRENT_WRITE: &str = "Accounts document was modified concurrently; retry the request";

/// The stored document as read, plus the ETag to write it back against.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Every account exactly as stored, encrypted passwords included.
    pub accounts: AccountsDocument,
    pub etag: Option<String>,
}

/// Client for the single accounts document at a fixed bucket + key.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn ObjectStore>,
    bucket: Arc<str>,
    key: Arc<str>,
}

impl DocumentStore {
    pub fn new(backend: Arc<dyn ObjectStore>, bucket: &str, key: &str) -> Self {
        Self {
            backend,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Returns `true` if the document can be probed. Any failure, including
    /// permission or network errors, counts as "does not exist".
    pub async fn exists(&self) -> bool {
        match self.backend.head(&self.bucket, &self.key).await {
            Ok(()) => true,
            Err(e) => {
                warn!(bucket = %self.bucket, key = %self.key, error = %e, "accounts document probe failed");
                false
            }
        }
    }

    /// Download the document with every `apiPassword` removed.
    ///
    /// # Errors
    ///
    /// NotFound if the document does not exist or its body is empty.
    pub async fn download(&self) -> Result<AccountsDocument, ServiceError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .accounts
            .iter()
            .map(|(id, account)| (id.clone(), account.redacted()))
            .collect())
    }

    /// Download the document as stored, together with its ETag.
    ///
    /// # Errors
    ///
    /// Same as [`DocumentStore::download`]; a body that is not a valid
    /// accounts document is an internal error.
    pub async fn snapshot(&self) -> Result<Snapshot, ServiceError> {
        if !self.exists().await {
            return Err(ServiceError::not_found(MISSING_DOCUMENT));
        }

        let object = self
            .backend
            .get(&self.bucket, &self.key)
            .await
            .map_err(|e| self.store_error(e, "download"))?;

        if object.body.iter().all(u8::is_ascii_whitespace) {
            return Err(ServiceError::not_found(EMPTY_DOCUMENT));
        }

        let accounts: AccountsDocument = serde_json::from_slice(&object.body).map_err(|e| {
            error!(bucket = %self.bucket, key = %self.key, error = %e, "accounts document is malformed");
            ServiceError::internal(format!("accounts document is malformed: {e}"))
        })?;

        info!(accounts = accounts.len(), "downloaded accounts document");
        Ok(Snapshot {
            accounts,
            etag: object.etag,
        })
    }

    /// Serialise and write the whole document.
    ///
    /// `if_match` is the ETag of the snapshot the document was derived from.
    ///
    /// # Errors
    ///
    /// BadRequest if the store does not confirm the write, NotAllowed if the
    /// document changed since the snapshot, NotFound if the bucket vanished.
    pub async fn upload(
        &self,
        accounts: &AccountsDocument,
        if_match: Option<String>,
    ) -> Result<(), ServiceError> {
        let body = serde_json::to_vec(accounts).map_err(|e| {
            ServiceError::internal(format!("failed to serialise accounts document: {e}"))
        })?;

        let etag = self
            .backend
            .put(&self.bucket, &self.key, Bytes::from(body), if_match)
            .await
            .map_err(|e| self.store_error(e, "upload"))?;

        match etag {
            Some(_) => {
                info!(accounts = accounts.len(), "uploaded accounts document");
                Ok(())
            }
            None => {
                warn!(bucket = %self.bucket, key = %self.key, "upload was not confirmed");
                Err(ServiceError::bad_request(UNCONFIRMED_UPLOAD))
            }
        }
    }

    fn store_error(&self, err: StoreError, op: &'static str) -> ServiceError {
        match err {
            StoreError::NotFound => ServiceError::not_found(MISSING_DOCUMENT),
            StoreError::PreconditionFailed => {
                warn!(bucket = %self.bucket, key = %self.key, op, "conditional write rejected");
                ServiceError::not_allowed(CONCURRENT_WRITE)
            }
            StoreError::Backend(_) => {
                error!(bucket = %self.bucket, key = %self.key, op, error = %err, "object store failure");
                ServiceError::internal(err.to_string())
            }
        }
    }
}
