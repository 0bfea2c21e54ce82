//! In-memory [`ObjectStore`] with S3-like ETag semantics, for tests only.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use common::protocol::AccountsDocument;
use tokio::sync::Mutex;

use super::object::{ObjectStore, StoreError, StoredObject};

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<(String, String), (Bytes, String)>,
    version: u64,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    inner: Mutex<Inner>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object with the serialised `accounts`.
    pub async fn insert_document(&self, bucket: &str, key: &str, accounts: &AccountsDocument) {
        let body = serde_json::to_vec(accounts).unwrap();
        self.insert_raw(bucket, key, Bytes::from(body)).await;
    }

    /// Seed an object with an arbitrary body.
    pub async fn insert_raw(&self, bucket: &str, key: &str, body: Bytes) {
        let mut inner = self.inner.lock().await;
        let etag = next_etag(&mut inner);
        inner
            .objects
            .insert((bucket.to_owned(), key.to_owned()), (body, etag));
    }

    /// Read back the stored document, passwords included.
    pub async fn document(&self, bucket: &str, key: &str) -> Option<AccountsDocument> {
        let inner = self.inner.lock().await;
        inner
            .objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .map(|(body, _)| serde_json::from_slice(body).unwrap())
    }
}

fn next_etag(inner: &mut Inner) -> String {
    inner.version += 1;
    format!("\"v{}\"", inner.version)
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn head(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let inner = self.inner.lock().await;
        if inner
            .objects
            .contains_key(&(bucket.to_owned(), key.to_owned()))
        {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .map(|(body, etag)| StoredObject {
                body: body.clone(),
                etag: Some(etag.clone()),
            })
            .ok_or(StoreError::NotFound)
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        if_match: Option<String>,
    ) -> Result<Option<String>, StoreError> {
        let mut inner = self.inner.lock().await;
        let location = (bucket.to_owned(), key.to_owned());
        if let Some(expected) = if_match {
            match inner.objects.get(&location) {
                Some((_, current)) if *current == expected => {}
                Some(_) => return Err(StoreError::PreconditionFailed),
                None => return Err(StoreError::NotFound),
            }
        }
        let etag = next_etag(&mut inner);
        inner.objects.insert(location, (body, etag.clone()));
        Ok(Some(etag))
    }
}
